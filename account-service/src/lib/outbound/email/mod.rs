pub mod smtp;

pub use smtp::SmtpVerificationMailer;
