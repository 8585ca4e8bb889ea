//! Domain models.
//!
//! Plain records as stored, plus the `New*`/`Update*` input records the
//! services accept and the per-entity relation enums used for eager
//! loading. Relation fields on a model are `None` until a service loads
//! them.

pub mod blog_post;
pub mod category;
pub mod contact_message;
pub mod lead;
pub mod line_item;
pub mod newsletter;
pub mod notification;
pub mod order;
pub mod price;
pub mod product;
pub mod quote_request;
pub mod testimonial;

pub use blog_post::{BlogPost, NewBlogPost, UpdateBlogPost};
pub use category::{Category, CategoryRelation, NewCategory, UpdateCategory};
pub use contact_message::{ContactMessage, NewContactMessage, UpdateContactMessage};
pub use lead::{Lead, NewLead, UpdateLead};
pub use line_item::{LineItem, NewLineItem};
pub use newsletter::{
    NewNewsletterSubscriber, NewNewsletterTemplate, NewsletterSubscriber, NewsletterTemplate,
    UpdateNewsletterSubscriber, UpdateNewsletterTemplate,
};
pub use notification::{NewNotification, Notification};
pub use order::{NewOrder, Order, OrderRelation, UpdateOrder};
pub use price::{NewPrice, Price, PriceRelation, UpdatePrice};
pub use product::{NewProduct, Product, ProductRelation, UpdateProduct};
pub use quote_request::{NewQuoteRequest, QuoteRequest, UpdateQuoteRequest};
pub use testimonial::{NewTestimonial, Testimonial, UpdateTestimonial};
