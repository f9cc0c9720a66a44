// src/rpc.rs
//
// JSON-RPC 2.0 request construction and id-based response correlation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const JSONRPC_VERSION: &str = "2.0";
pub const ETH_CALL: &str = "eth_call";

/// getReserves() selector (first 4 bytes of the signature hash).
pub const GET_RESERVES_SELECTOR: &str = "0x0902f1ac";
/// decimals() selector.
pub const DECIMALS_SELECTOR: &str = "0x313ce567";

/// One JSON-RPC 2.0 request. Ids are assigned by [`RequestBatch`],
/// sequentially from 1 within a batch.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: Value,
}

impl RpcRequest {
    /// `eth_call` against `to` with the given calldata, at the latest state.
    pub fn eth_call(id: u64, to: &str, data: &str) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: ETH_CALL,
            params: json!([{ "to": to, "data": data }, "latest"]),
        }
    }

    pub fn to_payload(&self) -> Value {
        // Plain strings and integers; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// One JSON-RPC response. `result` and `error` are both optional so that
/// absence is a typed case rather than a missing key.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl RpcResponse {
    /// The result, but only when it is a hex string a decoder can use.
    pub fn result_str(&self) -> Option<&str> {
        match &self.result {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// A node may answer a batch with a bare object or an array; both shapes
/// decode here and flatten into one ordered sequence.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RpcReply {
    Batch(Vec<RpcResponse>),
    Single(RpcResponse),
}

impl RpcReply {
    pub fn into_responses(self) -> Vec<RpcResponse> {
        match self {
            RpcReply::Batch(responses) => responses,
            RpcReply::Single(response) => vec![response],
        }
    }

    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }
}

/// A batch of requests with ids 1..=N plus the id→context table needed to
/// attribute responses back to their callers.
#[derive(Debug)]
pub struct RequestBatch<C> {
    requests: Vec<RpcRequest>,
    contexts: HashMap<u64, C>,
    next_id: u64,
}

impl<C> RequestBatch<C> {
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            contexts: HashMap::new(),
            next_id: 1,
        }
    }

    /// Adds one request, handing the assigned id to the builder closure.
    pub fn push(&mut self, context: C, build: impl FnOnce(u64) -> RpcRequest) {
        let id = self.next_id;
        self.next_id += 1;
        self.requests.push(build(id));
        self.contexts.insert(id, context);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// The batch serialized as a JSON array, ready for one transport call.
    pub fn to_payload(&self) -> Value {
        Value::Array(self.requests.iter().map(RpcRequest::to_payload).collect())
    }

    /// Attributes each response to its caller context by id, regardless of
    /// response order. Responses with unknown or missing ids are dropped.
    pub fn correlate(mut self, reply: RpcReply) -> Vec<(C, RpcResponse)> {
        reply
            .into_responses()
            .into_iter()
            .filter_map(|response| {
                let id = response.id?;
                self.contexts.remove(&id).map(|context| (context, response))
            })
            .collect()
    }
}

impl<C> Default for RequestBatch<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_from_one() {
        let mut batch = RequestBatch::new();
        for addr in ["0xaa", "0xbb", "0xcc"] {
            batch.push(addr, |id| RpcRequest::eth_call(id, addr, DECIMALS_SELECTOR));
        }
        let payload = batch.to_payload();
        let ids: Vec<u64> = payload
            .as_array()
            .unwrap()
            .iter()
            .map(|req| req["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn eth_call_params_shape() {
        let request = RpcRequest::eth_call(1, "0xpool", GET_RESERVES_SELECTOR);
        let payload = request.to_payload();
        assert_eq!(payload["jsonrpc"], "2.0");
        assert_eq!(payload["method"], "eth_call");
        assert_eq!(payload["params"][0]["to"], "0xpool");
        assert_eq!(payload["params"][0]["data"], "0x0902f1ac");
        assert_eq!(payload["params"][1], "latest");
    }

    #[test]
    fn correlation_is_by_id_not_position() {
        let mut batch = RequestBatch::new();
        batch.push("first", |id| RpcRequest::eth_call(id, "0xaa", DECIMALS_SELECTOR));
        batch.push("second", |id| RpcRequest::eth_call(id, "0xbb", DECIMALS_SELECTOR));

        // Responses arrive in reverse order.
        let reply = RpcReply::from_value(json!([
            { "jsonrpc": "2.0", "id": 2, "result": "0x06" },
            { "jsonrpc": "2.0", "id": 1, "result": "0x12" },
        ]))
        .unwrap();

        let correlated = batch.correlate(reply);
        assert_eq!(correlated.len(), 2);
        let by_context: HashMap<&str, &str> = correlated
            .iter()
            .map(|(ctx, resp)| (*ctx, resp.result_str().unwrap()))
            .collect();
        assert_eq!(by_context["first"], "0x12");
        assert_eq!(by_context["second"], "0x06");
    }

    #[test]
    fn unknown_and_missing_ids_are_dropped() {
        let mut batch = RequestBatch::new();
        batch.push("only", |id| RpcRequest::eth_call(id, "0xaa", DECIMALS_SELECTOR));

        let reply = RpcReply::from_value(json!([
            { "id": 99, "result": "0x01" },
            { "result": "0x02" },
            { "id": 1, "result": "0x12" },
        ]))
        .unwrap();

        let correlated = batch.correlate(reply);
        assert_eq!(correlated.len(), 1);
        assert_eq!(correlated[0].0, "only");
    }

    #[test]
    fn bare_object_reply_normalizes_to_one_element() {
        let reply = RpcReply::from_value(json!({ "id": 1, "result": "0x12" })).unwrap();
        let responses = reply.into_responses();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].id, Some(1));
    }

    #[test]
    fn non_string_result_is_not_usable() {
        let response: RpcResponse =
            serde_json::from_value(json!({ "id": 1, "result": 42 })).unwrap();
        assert!(response.result_str().is_none());

        let response: RpcResponse = serde_json::from_value(json!({ "id": 1 })).unwrap();
        assert!(response.result_str().is_none());
        assert!(response.error.is_none());
    }
}
