use std::{any::type_name, future::Future, mem};

use log::{debug, error, info};
use tokio::{
    select,
    sync::broadcast::{channel, Receiver, Sender},
};

use crate::{commands::Commands, error::Error, events::Events};

pub struct BusSender {
    commands_sender: Sender<Commands>,
    events_sender: Sender<Events>,
}

pub struct MessageBus {
    sender: BusSender,
    commands_recv: Option<Receiver<Commands>>,
    events_recv: Option<Receiver<Events>>,
}

pub trait BusHandler<TContext> {
    fn event_handler(
        bus: &BusSender,
        context: &mut TContext,
        event: Events,
    ) -> impl Future<Output = ()> + Send;
    fn command_handler(
        bus: &BusSender,
        context: &mut TContext,
        command: Commands,
    ) -> impl Future<Output = ()> + Send;
}

impl MessageBus {
    pub fn clone(self: &MessageBus) -> Self {
        Self {
            sender: self.sender.clone(),
            commands_recv: None,
            events_recv: None,
        }
    }
}

impl BusSender {
    pub fn send_cmd(&self, command: Commands) {
        if let Err(err) = self.commands_sender.send(command) {
            error!("{:?}", err);
        }
    }

    pub fn send_event(&self, event: Events) {
        if let Err(err) = self.events_sender.send(event) {
            error!("{:?}", err);
        }
    }

    /// Like [`BusSender::send_event`], but reports a bus nobody listens to.
    pub fn try_send_event(&self, event: Events) -> Result<(), Error> {
        self.events_sender
            .send(event)
            .map(|_| ())
            .map_err(|err| Error::Delivery(format!("no bus subscribers for {}", err.0.as_ref())))
    }
}

impl Clone for BusSender {
    fn clone(&self) -> Self {
        Self {
            commands_sender: self.commands_sender.clone(),
            events_sender: self.events_sender.clone(),
        }
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBus {
    pub fn new() -> Self {
        let (commands_sender, commands_recv) = channel::<Commands>(20);
        let (events_sender, events_recv) = channel::<Events>(64);

        Self {
            sender: BusSender {
                commands_sender,
                events_sender,
            },
            commands_recv: Some(commands_recv),
            events_recv: Some(events_recv),
        }
    }

    pub fn sender(&self) -> BusSender {
        self.sender.clone()
    }

    /// Starts buffering bus traffic right away instead of on the first poll
    /// of [`MessageBus::handle`].
    pub fn subscribe(&mut self) {
        let sender = &self.sender;

        self.commands_recv
            .get_or_insert_with(|| sender.commands_sender.subscribe());
        self.events_recv
            .get_or_insert_with(|| sender.events_sender.subscribe());
    }

    /// Runs `THandler` over everything on the bus until a
    /// [`Commands::Shutdown`] comes through, then hands the context back.
    #[inline]
    pub async fn handle<TContext, THandler>(mut bus: MessageBus, mut context: TContext) -> TContext
    where
        THandler: BusHandler<TContext>,
    {
        let handler_type = type_name::<THandler>();

        let size_of_context = mem::size_of::<TContext>();

        debug!("context {} bytes", size_of_context);

        info!("starting handle loop... {}", handler_type);

        let mut commands_receiver = bus
            .commands_recv
            .take()
            .unwrap_or_else(|| bus.sender.commands_sender.subscribe());

        let mut events_receiver = bus
            .events_recv
            .take()
            .unwrap_or_else(|| bus.sender.events_sender.subscribe());

        loop {
            let break_loop = Self::handle_command_or_event::<TContext, THandler>(
                &bus.sender,
                &mut commands_receiver,
                &mut events_receiver,
                &mut context,
                handler_type,
            )
            .await;

            if break_loop {
                break;
            }
        }

        info!("done {}", handler_type);

        context
    }

    async fn handle_command_or_event<TContext, THandler>(
        sender: &BusSender,
        commands_receiver: &mut Receiver<Commands>,
        events_receiver: &mut Receiver<Events>,
        context: &mut TContext,
        handler_type: &str,
    ) -> bool
    where
        THandler: BusHandler<TContext>,
    {
        let mut break_loop = false;

        select! {
            command_res = commands_receiver.recv() => {
                match command_res {
                    Ok(command) => {

                        if matches!(command, Commands::Shutdown) {
                            break_loop = true;
                        }

                        THandler::command_handler(sender, context, command).await;
                    },
                    Err(err) => {error!("{:?} {:?}", err, handler_type)},
                }
             }
             event_res = events_receiver.recv() => {
                match event_res {
                    Ok(event) => THandler::event_handler(sender, context, event).await,
                    Err(err) => {error!("{:?} {:?}", err, handler_type)},
                }
            }
        }

        break_loop
    }

    pub fn send_cmd(&self, command: Commands) {
        self.sender.send_cmd(command);
    }

    pub fn send_event(&self, event: Events) {
        self.sender.send_event(event);
    }
}
