//! Terminal output.
//!
//! Command results go to stdout; notices and failures go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use quickshop_core::Product;
use quickshop_storefront::error::{Notice, NoticeLevel};

/// Print a notice the way a toast would show it.
pub fn notice(notice: &Notice) {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
    };
    eprintln!("[{tag}] {notice}");
}

/// Print an error that happened before any notice could be produced.
pub fn fatal(message: &str) {
    eprintln!("[error] {message}");
}

pub fn line(text: &str) {
    println!("{text}");
}

/// One row of a product listing.
pub fn product_row(product: &Product) {
    println!(
        "{:>6}  {:<21}  {:>9}  {}",
        product.id.to_string(),
        product.short_title(Product::SHORT_TITLE_CHARS),
        product.price.to_string(),
        product.category
    );
}

/// Full product details.
pub fn product_details(product: &Product) {
    println!("{}", product.title);
    println!("{}", "=".repeat(product.title.chars().count().min(72)));
    println!("Price:    {}", product.price);
    println!("Category: {}", product.category);
    println!("Image:    {}", product.image);
    println!();
    println!("{}", product.description);
}
