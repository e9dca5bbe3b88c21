//! The stream contract every interaction is built on.
//!
//! A [`Source`] is a lazy, pull-driven sequence of byte chunks. A [`Sink`]
//! takes a `Source` and drives it to exhaustion, failing if the upstream
//! sequence fails. Piping is plain composition: `(stream.sink)(source)`.

use futures::future::BoxFuture;
use futures::stream::{self, BoxStream};
use futures::{FutureExt, StreamExt};
use std::fmt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::{Error, Result};

pub type Chunk = Vec<u8>;

pub type Source = BoxStream<'static, Result<Chunk>>;

pub type Sink = Box<dyn FnOnce(Source) -> BoxFuture<'static, Result<()>> + Send>;

/// Both directions of a point-to-point stream.
pub struct Duplex {
    pub sink: Sink,
    pub source: Source,
}

impl Duplex {
    pub fn new(sink: Sink, source: Source) -> Self {
        Duplex { sink, source }
    }

    pub fn into_parts(self) -> (Sink, Source) {
        (self.sink, self.source)
    }
}

impl fmt::Debug for Duplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Duplex")
    }
}

/// A finite source yielding `chunks` in order.
pub fn source_from<I>(chunks: I) -> Source
where
    I: IntoIterator<Item = Chunk>,
    I::IntoIter: Send + 'static,
{
    stream::iter(chunks.into_iter().map(Ok)).boxed()
}

pub fn empty_source() -> Source {
    stream::empty().boxed()
}

/// A sink that forwards every chunk into `sender`. Dropping the sender when
/// the input is exhausted ends the receiving source.
pub fn channel_sink(sender: mpsc::UnboundedSender<Result<Chunk>>) -> Sink {
    Box::new(move |mut source: Source| {
        async move {
            while let Some(chunk) = source.next().await {
                let chunk = chunk?;
                if sender.send(Ok(chunk)).is_err() {
                    return Err(Error::StreamClosed);
                }
            }
            Ok(())
        }
        .boxed()
    })
}

/// Two connected ends of an in-memory stream: whatever is sunk into one
/// comes out of the other's source.
pub fn pair() -> (Duplex, Duplex) {
    let (left_sender, left_receiver) = mpsc::unbounded_channel();
    let (right_sender, right_receiver) = mpsc::unbounded_channel();

    let left = Duplex::new(
        channel_sink(left_sender),
        UnboundedReceiverStream::new(right_receiver).boxed(),
    );
    let right = Duplex::new(
        channel_sink(right_sender),
        UnboundedReceiverStream::new(left_receiver).boxed(),
    );
    (left, right)
}
