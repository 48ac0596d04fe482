//! Metric names and labels emitted by the relay.

/// Label for the lock transition of an event (`acquire` or `release`).
pub const TRANSITION_LABEL: &str = "transition";

/// Label for the parsed command word.
pub const COMMAND_LABEL: &str = "command";

/// Label for the reason a notification was dropped.
pub const REASON_LABEL: &str = "reason";

/// Label for the component that reported a host loop exit.
pub const COMPONENT_LABEL: &str = "component";

/// Label for the error kind of a failure.
pub const ERROR_KIND_LABEL: &str = "error_kind";

/// Counter for push events applied to the store.
pub const LOCKRELAY_EVENTS_INGESTED_TOTAL: &str = "lockrelay_events_ingested_total";

/// Counter for commands received from the messaging client.
pub const LOCKRELAY_COMMANDS_RECEIVED_TOTAL: &str = "lockrelay_commands_received_total";

/// Counter for notifications handed to the messaging client.
pub const LOCKRELAY_NOTIFICATIONS_DISPATCHED_TOTAL: &str =
    "lockrelay_notifications_dispatched_total";

/// Counter for notifications dropped before delivery.
pub const LOCKRELAY_NOTIFICATIONS_DROPPED_TOTAL: &str = "lockrelay_notifications_dropped_total";

/// Counter for failed notification deliveries.
pub const LOCKRELAY_DELIVERY_FAILURES_TOTAL: &str = "lockrelay_delivery_failures_total";

/// Counter for host loop exits observed by the supervisor.
pub const LOCKRELAY_HOST_EXITS_TOTAL: &str = "lockrelay_host_exits_total";
