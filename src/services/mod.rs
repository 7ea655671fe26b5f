pub mod api_server;
pub mod certificate_service;
pub mod hasher;
pub mod identity_resolver;
pub mod validator;
pub mod verifier;
