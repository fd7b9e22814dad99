pub mod history_request;
pub mod history_route;
