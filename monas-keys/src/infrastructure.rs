pub mod rsa_provider;
