//! Terminal rendering shared by the commands.
//!
//! Product and seller names carry accents (é, è, ô), so columns are measured
//! in display width rather than bytes or chars.

use anyhow::Result;
use colored::*;
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use fabidrop::format_distance;
use fabidrop::search::RankedProduct;

const NAME_WIDTH: usize = 30;
const SELLER_WIDTH: usize = 26;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prices are whole XOF amounts.
pub fn format_price(price: f64) -> String {
    format!("{:.0} XOF", price.trunc())
}

pub fn format_rating(rating: f64, review_count: u32) -> String {
    format!("★ {:.1} ({} avis)", rating, review_count)
}

/// Cut `text` to at most `max_width` columns, marking the cut with "...".
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Left-align `text` in a column of `width` display columns.
pub fn pad(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

pub fn print_product_rows(rows: &[RankedProduct]) {
    for (i, row) in rows.iter().enumerate() {
        let product = &row.product;
        let seller = row.seller_name.as_deref().unwrap_or("?");

        let mut line = format!(
            "{:>3}. {} {:>12}  {}",
            i + 1,
            pad(&product.name, NAME_WIDTH).cyan(),
            format_price(product.price),
            pad(seller, SELLER_WIDTH)
        );
        if let Some(d) = row.distance_m {
            line.push_str(&format!(" {:>7}", format_distance(d)));
        }
        if let Some(score) = row.score {
            line.push_str(&format!(" {}", format!("({:.2})", score).dimmed()));
        }
        if !product.is_available() {
            line.push_str(&format!(" {}", "rupture".red()));
        }
        println!("{}", line);
    }
}

pub fn print_more(shown: usize, total: usize) {
    if total > shown {
        println!();
        println!("{}", format!("... and {} more results", total - shown).dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(25000.0), "25000 XOF");
        assert_eq!(format_price(8000.75), "8000 XOF");
    }

    #[test]
    fn test_truncate_by_width() {
        assert_eq!(truncate("Robe", 10), "Robe");
        assert_eq!(truncate("Robe Rouge Élégante", 10), "Robe Ro...");
        assert_eq!(truncate("Robe Rouge Élégante", 10).width(), 10);
    }

    #[test]
    fn test_pad_accented() {
        let padded = pad("Beauté & Co", 14);
        assert_eq!(padded.width(), 14);
        assert!(padded.starts_with("Beauté & Co"));
        assert_eq!(pad("Tech Store Thiès", 8), "Tech ...");
    }
}
