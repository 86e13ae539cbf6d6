mod store;
mod validation;

pub use store::{PhotoStore, PhotoTicket};
pub use validation::{
    DecodeError, ImageCrateDecoder, ImageDecoder, ImageDimensions, PhotoPolicy, PhotoValidator,
};
