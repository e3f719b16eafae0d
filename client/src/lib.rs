//! # Widget Sync Client
//! Per-session runtime that applies batches of remote operations to a local
//! widget graph and stages client-originated changes for the way back.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

#[macro_use]
extern crate cfg_if;

pub mod shared {
    pub use widget_sync_shared::{
        value, Action, Appearance, AppearanceError, Batch, ClientObject, DecodeError,
        HandlerContext, HandlerError, HandlerPlugin, HandlerRegistry, Hoverable, Millis,
        ObjectRef, Operation, Origin, OutboundBatch, OutboundOperation, Properties,
        RadioGroupMember, RemoteId, RemoteObject, StateSet, StyleMap, Theme, ThemeAware,
        TypeHandler, Value,
    };
}

mod connection;
mod grid;
mod processor;

pub use connection::{config::ConnectionConfig, connection::Connection, error::ConnectionError};
pub use grid::{
    handlers::{GridPlugin, GRID_ITEM_TYPE, GRID_TYPE},
    model::{NodeId, TreeModel},
    synchronizer::{GridSynchronizer, SET_DATA_SEND_DELAY},
    tree::{GridItem, SelectionMode, Tree},
};
pub use processor::{
    error::ProtocolError,
    message_processor::MessageProcessor,
    report::{BatchReport, OperationFailure},
};
