//! GraphQL subscriptions for real-time updates
//!
//! Subscriptions relay create events from the store change feed over
//! WebSocket, forwarding each payload verbatim. Closing the client
//! connection drops the stream and with it the broadcast receiver, so no
//! listener outlives its subscriber.

use async_graphql::{Context, Subscription};
use futures::Stream;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::db::{Database, StoreEvent};

use super::types::{Link, Vote};

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Emits each newly posted link
    async fn new_link<'ctx>(&self, ctx: &Context<'ctx>) -> impl Stream<Item = Link> + 'ctx {
        let receiver = ctx.data_unchecked::<Database>().subscribe();

        BroadcastStream::new(receiver).filter_map(|result| {
            result.ok().and_then(|event| match event {
                StoreEvent::LinkCreated(record) => Some(record.into()),
                _ => None,
            })
        })
    }

    /// Emits each newly cast vote
    async fn new_vote<'ctx>(&self, ctx: &Context<'ctx>) -> impl Stream<Item = Vote> + 'ctx {
        let receiver = ctx.data_unchecked::<Database>().subscribe();

        BroadcastStream::new(receiver).filter_map(|result| {
            result.ok().and_then(|event| match event {
                StoreEvent::VoteCreated(record) => Some(record.into()),
                _ => None,
            })
        })
    }
}
