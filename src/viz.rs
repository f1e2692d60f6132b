//! Chart rendering with Plotters and console tables for the dashboard

use crate::rules::AssociationRule;
use crate::text::WordCount;
use crate::views::{PricePoint, ProductSummary};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::info;

/// Cold-to-warm ramp used to colour points by discount percentage
const DISCOUNT_RAMP: [RGBColor; 5] = [
    RGBColor(59, 76, 192),
    RGBColor(141, 176, 254),
    RGBColor(221, 221, 221),
    RGBColor(244, 154, 123),
    RGBColor(180, 4, 38),
];

/// Palette cycled through the word cloud
const WORD_COLORS: [RGBColor; 6] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(190, 160, 20),
    RGBColor(200, 60, 60),
];

fn discount_color(discount_percentage: f64) -> RGBColor {
    let bucket = (discount_percentage.clamp(0.0, 100.0) / 100.0 * (DISCOUNT_RAMP.len() - 1) as f64)
        .round() as usize;
    DISCOUNT_RAMP[bucket.min(DISCOUNT_RAMP.len() - 1)]
}

/// Scatter of actual vs discounted price, coloured and sized by discount.
///
/// # Arguments
/// * `points` - Projection of the filtered products
/// * `output_path` - Path to save the PNG plot
pub fn create_price_scatter(points: &[PricePoint], output_path: &Path) -> anyhow::Result<()> {
    if points.is_empty() {
        anyhow::bail!("no complete price rows to plot");
    }

    let x_max = points.iter().map(|p| p.actual_price).fold(f64::NEG_INFINITY, f64::max);
    let y_max = points
        .iter()
        .map(|p| p.discounted_price)
        .fold(f64::NEG_INFINITY, f64::max);
    let x_max = (x_max * 1.05).max(1.0);
    let y_max = (y_max * 1.05).max(1.0);

    let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Price vs Discount Analysis", ("sans-serif", 26))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Actual Price")
        .y_desc("Discounted Price")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(points.iter().map(|p| {
        let radius = 3 + (p.discount_percentage.clamp(0.0, 100.0) / 100.0 * 9.0) as i32;
        Circle::new(
            (p.actual_price, p.discounted_price),
            radius,
            discount_color(p.discount_percentage).mix(0.7).filled(),
        )
    }))?;

    root.present()?;
    info!("Price scatter saved to: {}", output_path.display());

    Ok(())
}

/// Draw the most frequent review words, larger for more frequent ones.
///
/// Words are laid out in rows from the top-left, biggest first; words that
/// no longer fit on the canvas are left out.
pub fn create_word_cloud(words: &[WordCount], output_path: &Path) -> anyhow::Result<()> {
    const WIDTH: u32 = 800;
    const HEIGHT: u32 = 400;
    const MARGIN: i32 = 8;
    const MIN_FONT: f64 = 10.0;
    const MAX_FONT: f64 = 64.0;

    if words.is_empty() {
        anyhow::bail!("no words to draw");
    }

    let root = BitMapBackend::new(output_path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_count = words.iter().map(|w| w.count).max().unwrap_or(1) as f64;
    let min_count = words.iter().map(|w| w.count).min().unwrap_or(1) as f64;
    let spread = (max_count - min_count).max(1.0);

    let (mut x, mut y) = (MARGIN, MARGIN);
    let mut row_height = 0;

    for (i, word) in words.iter().enumerate() {
        let scale = (word.count as f64 - min_count) / spread;
        let size = MIN_FONT + scale * (MAX_FONT - MIN_FONT);
        // Rough advance width for a sans-serif face
        let width = (word.word.chars().count() as f64 * size * 0.6).ceil() as i32;
        let height = size.ceil() as i32;

        if x + width > WIDTH as i32 - MARGIN {
            x = MARGIN;
            y += row_height + MARGIN / 2;
            row_height = 0;
        }
        if y + height > HEIGHT as i32 - MARGIN {
            break;
        }

        let color = WORD_COLORS[i % WORD_COLORS.len()];
        let style = TextStyle::from(("sans-serif", size).into_font())
            .color(&color)
            .pos(Pos::new(HPos::Left, VPos::Top));
        root.draw(&Text::new(word.word.clone(), (x, y), style))?;

        x += width + MARGIN;
        row_height = row_height.max(height);
    }

    root.present()?;
    info!("Word cloud saved to: {}", output_path.display());

    Ok(())
}

fn cell_f64(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

fn cell_text(value: Option<&str>, width: usize) -> String {
    let text = value.unwrap_or("-");
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Print a product table (preview or top-rated)
pub fn print_product_table(title: &str, rows: &[ProductSummary]) {
    println!("\n=== {} ===", title);
    println!(
        "  {:<40} | {:<24} | {:>10} | {:>10} | {:>6} | {:>8}",
        "Product", "Category", "Discounted", "Actual", "Rating", "Count"
    );
    println!("  {}", "-".repeat(40 + 24 + 10 + 10 + 6 + 8 + 15));
    for row in rows {
        println!(
            "  {:<40} | {:<24} | {:>10} | {:>10} | {:>6} | {:>8}",
            cell_text(row.product_name.as_deref(), 40),
            cell_text(row.category.as_deref(), 24),
            cell_f64(row.discounted_price),
            cell_f64(row.actual_price),
            row.rating.map_or_else(|| "-".to_string(), |r| format!("{:.1}", r)),
            row.rating_count
                .map_or_else(|| "-".to_string(), |c| c.to_string()),
        );
    }
}

/// Print the association rule table
pub fn print_rules_table(rules: &[AssociationRule]) {
    println!("\n=== Association Rules ===");
    println!(
        "  {:<32} | {:<32} | {:>8} | {:>10} | {:>6}",
        "Antecedents", "Consequents", "Support", "Confidence", "Lift"
    );
    println!("  {}", "-".repeat(32 + 32 + 8 + 10 + 6 + 12));
    for rule in rules {
        println!(
            "  {:<32} | {:<32} | {:>8.4} | {:>10.3} | {:>6.2}",
            cell_text(Some(&rule.antecedents.join(", ")), 32),
            cell_text(Some(&rule.consequents.join(", ")), 32),
            rule.support,
            rule.confidence,
            rule.lift
        );
    }
}
