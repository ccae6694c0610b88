//! Binding the TySON core to a send/receive transport.

use std::fmt;

use tyson_types::{Config, Journal, Query};

use crate::error::Error;
use crate::response::decode_journal;

/// A request/reply framed byte channel. The core consumes this trait and
/// never fragments or aggregates: one `send` call carries exactly one
/// query, one `recv` call returns exactly one response.
///
/// The reference server speaks this over a ZeroMQ REQ socket; any
/// equivalent framed request/reply transport suffices, and no concrete
/// implementation ships with this crate.
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
    fn recv(&mut self) -> Result<Vec<u8>, Self::Error>;
}

/// Binds a [`Transport`] to the TySON wire protocol: turns a built
/// [`Query`] into a [`Journal`].
///
/// At most one query may be in flight per connection; every `send` blocks
/// until the matching reply arrives or the transport fails. The
/// connection is not thread-safe for concurrent use.
pub struct Connection<T> {
    config: Config,
    transport: T,
}

impl<T> fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Connection<T> {
    pub fn new(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sends `query` and waits for the matching reply.
    ///
    /// Returns `Ok(None)` on a transport or parse failure, distinct from
    /// `Err`, which is reserved for failures raised before any I/O. A
    /// server-reported error response still produces `Ok(Some(journal))`
    /// with `journal.ok() == false`.
    pub fn send(&mut self, query: &Query) -> Result<Option<Journal>, Error> {
        let wire = query.to_string();
        log::debug!("-> {wire}");

        if let Err(e) = self.transport.send(wire.as_bytes()) {
            log::warn!("transport send failed: {e}");
            return Ok(None);
        }

        let bytes = match self.transport.recv() {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("transport recv failed: {e}");
                return Ok(None);
            }
        };

        let text = match std::str::from_utf8(&bytes) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("response is not valid UTF-8: {e}");
                return Ok(None);
            }
        };
        log::debug!("<- {text}");

        match decode_journal(text) {
            Ok(journal) => {
                if !journal.ok() {
                    log::warn!("server reported ok=false");
                }
                Ok(Some(journal))
            }
            Err(e) => {
                log::debug!("response parse failed: {e}");
                Ok(None)
            }
        }
    }

    /// Releases the transport, consuming the connection.
    pub fn close(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tyson_types::Value;

    #[derive(Debug, thiserror::Error)]
    #[error("mock transport failure")]
    struct MockError;

    #[derive(Debug, Default)]
    struct MockTransport {
        sent: Vec<Vec<u8>>,
        replies: VecDeque<Vec<u8>>,
        fail_send: bool,
        fail_recv: bool,
    }

    impl Transport for MockTransport {
        type Error = MockError;

        fn send(&mut self, bytes: &[u8]) -> Result<(), MockError> {
            if self.fail_send {
                return Err(MockError);
            }
            self.sent.push(bytes.to_vec());
            Ok(())
        }

        fn recv(&mut self) -> Result<Vec<u8>, MockError> {
            if self.fail_recv {
                return Err(MockError);
            }
            self.replies.pop_front().ok_or(MockError)
        }
    }

    #[test]
    fn send_round_trips_through_a_mock_transport() {
        let reply = b"result:ok[response{s|data|:ids[test|4339ace2-9ab3-4c79-b557-f9b78d66b7f9|,],s|meta|:find_meta{s|count|:n|1|,},},];".to_vec();
        let mut transport = MockTransport::default();
        transport.replies.push_back(reply);

        let config = Config::new("localhost", 4242, "user", "pass");
        let mut connection = Connection::new(config, transport);

        let query = Query::new("test")
            .unwrap()
            .insert([Value::number("10").unwrap()])
            .unwrap();
        let journal = connection.send(&query).unwrap().expect("journal");

        assert!(journal.ok());
        assert_eq!(connection.close().sent[0], b"collection|test|:insert[n|10|,];");
    }

    #[test]
    fn send_failure_yields_none_not_err() {
        let mut transport = MockTransport::default();
        transport.fail_send = true;
        let mut connection = Connection::new(Config::new("h", 1, "u", "p"), transport);
        let query = Query::new("test").unwrap().insert([Value::Null]).unwrap();
        assert!(connection.send(&query).unwrap().is_none());
    }

    #[test]
    fn recv_failure_yields_none_not_err() {
        let mut transport = MockTransport::default();
        transport.fail_recv = true;
        let mut connection = Connection::new(Config::new("h", 1, "u", "p"), transport);
        let query = Query::new("test").unwrap().insert([Value::Null]).unwrap();
        assert!(connection.send(&query).unwrap().is_none());
    }

    #[test]
    fn malformed_response_yields_none_not_err() {
        let mut transport = MockTransport::default();
        transport.replies.push_back(b"not tyson at all".to_vec());
        let mut connection = Connection::new(Config::new("h", 1, "u", "p"), transport);
        let query = Query::new("test").unwrap().insert([Value::Null]).unwrap();
        assert!(connection.send(&query).unwrap().is_none());
    }
}
