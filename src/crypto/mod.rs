//INFO: Cryptography module for Parley
//NOTE: Encrypts the stored access token at rest

pub mod encryption;

pub use encryption::TokenCipher;
