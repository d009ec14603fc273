/// WebSocket message types for client-server communication
use log::error;
use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardSnapshot;
use crate::filter::Facet;
use crate::state::Event;
use crate::view::SortColumn;

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Request the current snapshot without changing anything
    Query,

    /// Pin a facet to a value (an empty value unsets it)
    SetFilter { facet: Facet, value: String },

    ClearFilter { facet: Facet },

    ResetFilters,

    /// Sort by a column, toggling direction if it is already the sort column
    SortBy { column: SortColumn },

    GoToPage { page: usize },

    NextPage,

    PreviousPage,
}

impl ClientMessage {
    /// The state transition this message asks for; `None` for a plain query.
    pub fn into_event(self) -> Option<Event> {
        match self {
            ClientMessage::Query => None,
            ClientMessage::SetFilter { facet, value } => Some(Event::SetFilter(facet, value)),
            ClientMessage::ClearFilter { facet } => Some(Event::ClearFilter(facet)),
            ClientMessage::ResetFilters => Some(Event::ResetFilters),
            ClientMessage::SortBy { column } => Some(Event::SortBy(column)),
            ClientMessage::GoToPage { page } => Some(Event::GoToPage(page)),
            ClientMessage::NextPage => Some(Event::NextPage),
            ClientMessage::PreviousPage => Some(Event::PreviousPage),
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Everything needed to redraw after an event
    Snapshot(Box<DashboardSnapshot>),

    /// Error occurred
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Wire form of this message.
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to serialize server message: {}", e);
                r#"{"type":"Error","message":"Failed to serialize response"}"#.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Dashboard;
    use crate::state::DashboardState;
    use crate::testing::{ev, shared};

    #[test]
    fn test_parse_client_messages() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"SetFilter","facet":"make","value":"TESLA"}"#).unwrap();
        assert_eq!(
            msg.into_event(),
            Some(Event::SetFilter(Facet::Make, "TESLA".to_string()))
        );

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"SortBy","column":"Model Year"}"#).unwrap();
        assert_eq!(msg.into_event(), Some(Event::SortBy(SortColumn::ModelYear)));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"GoToPage","page":4}"#).unwrap();
        assert_eq!(msg.into_event(), Some(Event::GoToPage(4)));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"Query"}"#).unwrap();
        assert_eq!(msg.into_event(), None);

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"NextPage"}"#).unwrap();
        assert_eq!(msg.into_event(), Some(Event::NextPage));
    }

    #[test]
    fn test_reject_unknown_values() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"SortBy","column":"VIN"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(
            r#"{"type":"ClearFilter","facet":"color"}"#
        )
        .is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"InsertRow"}"#).is_err());
    }

    #[test]
    fn test_server_message_wire_format() {
        let error: serde_json::Value =
            serde_json::from_str(&ServerMessage::error("boom").to_json()).unwrap();
        assert_eq!(error["type"], "Error");
        assert_eq!(error["message"], "boom");

        let dashboard = Dashboard::new(shared(vec![ev("KIA", "2022", "King", "BEV")]));
        let snapshot = dashboard.snapshot(&DashboardState::new());
        let json: serde_json::Value =
            serde_json::from_str(&ServerMessage::Snapshot(Box::new(snapshot)).to_json()).unwrap();
        assert_eq!(json["type"], "Snapshot");
        assert_eq!(json["summary"]["totalEVs"], 1);
        assert_eq!(json["page"]["rows"][0]["Make"], "KIA");
    }
}
