pub mod pkce;
pub mod secrets;
