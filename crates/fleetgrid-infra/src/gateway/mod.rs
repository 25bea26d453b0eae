//! Backend gateway implementations

mod http_schedule_gateway;

pub use http_schedule_gateway::HttpScheduleGateway;
