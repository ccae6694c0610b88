//! End-to-end coverage: build a query with `tyson-types`, encode it, run it
//! through a mock transport, and decode the reply back into a `Journal`.

use std::collections::VecDeque;

use tyson_codec::encode::Encoder;
use tyson_codec::{Connection, QueryCodec, Transport};
use tyson_types::{Comparator, Config, Find, MetaKind, Query, Sort, Value};

#[derive(Debug, thiserror::Error)]
#[error("mock transport failure")]
struct MockError;

#[derive(Debug, Default)]
struct ScriptedTransport {
    sent: Vec<Vec<u8>>,
    replies: VecDeque<Vec<u8>>,
}

impl ScriptedTransport {
    fn with_reply(reply: &str) -> Self {
        let mut transport = Self::default();
        transport.replies.push_back(reply.as_bytes().to_vec());
        transport
    }
}

impl Transport for ScriptedTransport {
    type Error = MockError;

    fn send(&mut self, bytes: &[u8]) -> Result<(), MockError> {
        self.sent.push(bytes.to_vec());
        Ok(())
    }

    fn recv(&mut self) -> Result<Vec<u8>, MockError> {
        self.replies.pop_front().ok_or(MockError)
    }
}

fn connect(reply: &str) -> Connection<ScriptedTransport> {
    let config = Config::new("localhost", 4242, "alice", "hunter2");
    Connection::new(config, ScriptedTransport::with_reply(reply))
}

#[test]
fn insert_then_get_round_trip() {
    let insert_reply = "result:ok[response{s|data|:ids[test|4339ace2-9ab3-4c79-b557-f9b78d66b7f9|,],s|meta|:insert_meta{s|count|:n|1|,},},];";
    let mut connection = connect(insert_reply);

    let insert = Query::new("test")
        .unwrap()
        .insert([Value::number("10").unwrap(), Value::string("ten")])
        .unwrap();
    assert_eq!(
        QueryCodec.encode(&insert),
        "collection|test|:insert[n|10|,s|ten|,];"
    );

    let journal = connection.send(&insert).unwrap().expect("journal");
    assert!(journal.ok());
    assert_eq!(journal.meta().kind(), MetaKind::Insert);
    assert_eq!(journal.meta().count().unwrap(), 1);
    assert_eq!(journal.data().ids("test").len(), 1);
}

#[test]
fn find_with_sort_limit_offset_builds_the_exact_pipeline() {
    let query = Query::new("test")
        .unwrap()
        .find(Find::new().push(Comparator::eq_field("status", Value::string("active"))))
        .unwrap()
        .sort(Sort::new().push_desc("created_at"))
        .unwrap()
        .limit(10)
        .unwrap()
        .offset(20)
        .unwrap();

    assert_eq!(
        query.to_string(),
        "collection|test|:q[find[eq{value|status|: s|active|},],sort[desc(value|created_at|),],limit(n|10|),offset(n|20|),];"
    );
}

#[test]
fn server_error_result_surfaces_as_ok_false_not_err() {
    let reply = "result:err[response{s|data|:ids[],s|meta|:none{s|count|:n|0|,},},];";
    let mut connection = connect(reply);

    let query = Query::new("test").unwrap().get_links([]).unwrap();
    let journal = connection.send(&query).unwrap().expect("journal");

    assert!(!journal.ok());
    assert_eq!(journal.meta().kind(), MetaKind::None);
}

#[test]
fn delete_cannot_start_a_pipeline() {
    assert!(Query::new("test").unwrap().delete().is_err());
}
