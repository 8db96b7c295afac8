pub mod client_dto;
