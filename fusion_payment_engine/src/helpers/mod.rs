mod checksum;
mod checkout_urls;

pub use checkout_urls::CheckoutUrls;
pub use checksum::{mint_checksum, verify_checksum, CHECKSUM_DATE_FORMAT};
