//! In-process [`Gateway`] for tests.
//!
//! Responses are queued per [`Method`] and handed out in FIFO order. Every
//! call is recorded with its encoded request and metadata so tests can
//! assert on what the SDK sent. A call with nothing queued fails with
//! `UNIMPLEMENTED`.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;

use prost::Message;

use crate::grpc::GrpcError;
use crate::service::{Gateway, Metadata, Method};

/// One call received by a [`MockGateway`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    /// Prost-encoded request.
    pub request: Vec<u8>,
    pub metadata: Metadata,
}

impl RecordedCall {
    /// Decodes the recorded request.
    ///
    /// # Errors
    ///
    /// Returns the decode error if the bytes are not an `M`.
    pub fn decode<M: Message + Default>(&self) -> Result<M, prost::DecodeError> {
        M::decode(self.request.as_slice())
    }

    /// Returns the value of metadata entry `key`, if present.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct MockState {
    responses: HashMap<Method, VecDeque<Result<Vec<u8>, GrpcError>>>,
    calls: Vec<RecordedCall>,
}

/// Scripted gateway backed by per-method response queues.
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    /// Creates a mock with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `response` for the next call to `method`.
    pub fn respond<M: Message>(&self, method: Method, response: M) -> &Self {
        self.push(method, Ok(response.encode_to_vec()));
        self
    }

    /// Queues a failure status for the next call to `method`.
    pub fn fail(&self, method: Method, code: tonic::Code, message: &str) -> &Self {
        self.push(
            method,
            Err(GrpcError::Status {
                code,
                message: message.to_owned(),
            }),
        );
        self
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state
            .lock()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    /// Calls received for `method`, in order.
    pub fn calls_to(&self, method: Method) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    /// Number of queued responses not yet consumed.
    pub fn pending(&self) -> usize {
        self.state
            .lock()
            .map(|s| s.responses.values().map(VecDeque::len).sum())
            .unwrap_or_default()
    }

    fn push(&self, method: Method, response: Result<Vec<u8>, GrpcError>) {
        if let Ok(mut state) = self.state.lock() {
            state.responses.entry(method).or_default().push_back(response);
        }
    }

    fn next<Resp: Message + Default>(
        &self,
        method: Method,
        request: Vec<u8>,
        metadata: Metadata,
    ) -> Result<Resp, GrpcError> {
        let mut state = self.state.lock().map_err(|_| GrpcError::Status {
            code: tonic::Code::Internal,
            message: "mock gateway lock poisoned".into(),
        })?;
        state.calls.push(RecordedCall {
            method,
            request,
            metadata,
        });
        let bytes = state
            .responses
            .get_mut(&method)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| GrpcError::Status {
                code: tonic::Code::Unimplemented,
                message: format!("no response queued for {method}"),
            })??;
        Resp::decode(bytes.as_slice()).map_err(|e| GrpcError::Status {
            code: tonic::Code::Internal,
            message: format!("queued response for {method} does not decode: {e}"),
        })
    }
}

impl Gateway for MockGateway {
    fn unary<Req, Resp>(
        &self,
        method: Method,
        request: Req,
        metadata: Metadata,
    ) -> impl Future<Output = Result<Resp, GrpcError>> + Send
    where
        Req: Message + Send + Sync + 'static,
        Resp: Message + Default + Send + Sync + 'static,
    {
        let result = self.next(method, request.encode_to_vec(), metadata);
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::gateway::{GetMemberRequest, GetMemberResponse};
    use crate::proto::member::Member;

    fn member(id: &str) -> GetMemberResponse {
        GetMemberResponse {
            member: Some(Member {
                id: id.into(),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn returns_queued_responses_in_order() {
        let mock = MockGateway::new();
        mock.respond(Method::GetMember, member("m:1"))
            .respond(Method::GetMember, member("m:2"));

        for expected in ["m:1", "m:2"] {
            let resp: GetMemberResponse = mock
                .unary(Method::GetMember, GetMemberRequest::default(), vec![])
                .await
                .unwrap();
            assert_eq!(resp.member.unwrap().id, expected);
        }
        assert_eq!(mock.pending(), 0);
    }

    #[tokio::test]
    async fn records_request_and_metadata() {
        let mock = MockGateway::new();
        mock.respond(Method::GetMember, member("m:1"));

        let request = GetMemberRequest {
            member_id: "m:1".into(),
        };
        let _: GetMemberResponse = mock
            .unary(
                Method::GetMember,
                request.clone(),
                vec![("token-member-id", "m:1".into())],
            )
            .await
            .unwrap();

        let calls = mock.calls_to(Method::GetMember);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].decode::<GetMemberRequest>().unwrap(), request);
        assert_eq!(calls[0].header("token-member-id"), Some("m:1"));
        assert_eq!(calls[0].header("token-key-id"), None);
    }

    #[tokio::test]
    async fn unqueued_method_is_unimplemented() {
        let mock = MockGateway::new();
        let err = mock
            .unary::<_, GetMemberResponse>(Method::GetMember, GetMemberRequest::default(), vec![])
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(tonic::Code::Unimplemented));
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn queued_failure_is_returned() {
        let mock = MockGateway::new();
        mock.fail(Method::GetMember, tonic::Code::NotFound, "gone");
        let err = mock
            .unary::<_, GetMemberResponse>(Method::GetMember, GetMemberRequest::default(), vec![])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GrpcError::Status {
                code: tonic::Code::NotFound,
                message: "gone".into()
            }
        );
    }
}
