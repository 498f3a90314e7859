use std::path::Path;
use std::sync::Arc;

use log::{error, info};

use crate::message_bus::{BusHandler, BusSender, MessageBus};
use crate::persistence::{PersistenceUnit, PersistenceUnitDto};
use crate::storage::FileStorage;
use crate::{commands::Commands, events::Events};

pub struct PersisterModule {}

pub struct Context {
    storage: FileStorage,
}

impl BusHandler<Context> for PersisterModule {
    async fn event_handler(_bus: &BusSender, _context: &mut Context, _event: Events) {}

    async fn command_handler(bus: &BusSender, context: &mut Context, command: Commands) {
        match command {
            Commands::Persist(persistence_unit) => {
                let dto = match PersistenceUnitDto::try_from(persistence_unit) {
                    Ok(dto) => dto,
                    Err(error) => {
                        error!("{}", error);
                        return;
                    }
                };

                let kind = dto.kind;
                info!("persisting {:?}", kind);

                if let Ok(existing) = context.storage.read_bytes(kind.as_ref()).await {
                    if existing == dto.data {
                        info!("persisting of {:?} skipped, unchanged", kind);

                        return;
                    }
                }

                let result = context.storage.write_bytes(kind.as_ref(), &dto.data).await;

                match result {
                    Ok(()) => bus.send_event(Events::Persisted(kind)),
                    Err(error) => error!("{}", error),
                }
            }
            Commands::Restore(kind) => {
                info!("restoring {:?}", kind);

                let result = context.storage.read_bytes(kind.as_ref()).await;

                let persistence_unit = PersistenceUnit {
                    kind,
                    data: result.map(Arc::new),
                };

                bus.send_event(Events::Restored(persistence_unit));
            }
            _ => {}
        }
    }
}

impl PersisterModule {
    pub async fn start(mut bus: MessageBus, state_dir: &Path) {
        info!("starting...");

        // commands sent while the state dir is being created are kept
        bus.subscribe();

        let storage = match FileStorage::create(state_dir).await {
            Ok(storage) => storage,
            Err(error) => {
                error!("state dir {} unavailable: {}", state_dir.display(), error);
                return;
            }
        };

        let context = Context { storage };

        MessageBus::handle::<Context, Self>(bus, context).await;

        info!("done.");
    }
}
