mod c32;
mod value;

pub use c32::{
    c32_address, c32_address_decode, c32_decode, c32_encode, C32Error, MAINNET_MULTI_SIG,
    MAINNET_SINGLE_SIG, TESTNET_MULTI_SIG, TESTNET_SINGLE_SIG,
};
pub use value::{ClarityError, ClarityValue, StandardPrincipal};
