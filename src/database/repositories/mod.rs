//! Database repositories module
//!
//! One repository per aggregate, each owning its SQL

pub mod cart;
pub mod category;
pub mod channel_post;
pub mod customer;
pub mod order;
pub mod product;

pub use cart::CartRepository;
pub use category::CategoryRepository;
pub use channel_post::ChannelPostRepository;
pub use customer::CustomerRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
