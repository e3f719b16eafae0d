//! # Widget Sync Shared
//! Object identity, type handlers, wire operations, outbound staging and
//! appearance resolution shared by every widget synchronization session.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod appearance;
mod handler;
mod messages;
mod object;
mod remote;
mod time;
mod types;

pub use appearance::{
    appearance_cache::AppearanceCache,
    error::AppearanceError,
    state_set::{StateIndex, StateSet},
    theme::{Appearance, StyleFn, StyleMap, Theme},
};
pub use handler::{
    error::HandlerError,
    handler_context::{HandlerContext, Origin},
    handler_registry::{HandlerPlugin, HandlerRegistry},
    type_handler::{
        Destructor, Factory, MethodHandler, PropertyApplier, ScriptingMethod, TypeHandler,
        TypeHandlerBuilder,
    },
    value,
};
pub use messages::{
    error::DecodeError,
    operation::{Action, Batch, Operation},
    outbound::{OutboundBatch, OutboundOperation},
};
pub use object::{
    capability::{Hoverable, RadioGroup, RadioGroupMember, ThemeAware},
    client_object::{object_ref, AsAny, ClientObject, ObjectRef},
    error::RegistryError,
    object_registry::{ObjectRegistry, RegistryEntry},
};
pub use remote::{
    error::OutboundError,
    outbound_channel::{OutboundChannel, SuspendGuard},
    remote_object::RemoteObject,
};
pub use time::{
    clock::Clock,
    scheduler::{DueTimer, Scheduler, TimerHandle, TimerTask},
};
pub use types::{Millis, Properties, RemoteId, Value};
