pub mod certificate;
pub mod verification_result;
