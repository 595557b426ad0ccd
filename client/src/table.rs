// src/table.rs

//! Paged text rendering of the product list.

use stockroom_core::Product;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug)]
pub struct Page<'a> {
  pub items: &'a [Product],
  /// 1-based.
  pub number: usize,
  pub page_count: usize,
  pub total: usize,
}

/// Slices out page `number` (1-based). Out-of-range numbers are clamped to
/// the first or last page.
pub fn paginate(products: &[Product], number: usize, page_size: usize) -> Page<'_> {
  let page_size = page_size.max(1);
  let page_count = products.len().div_ceil(page_size).max(1);
  let number = number.clamp(1, page_count);
  let start = (number - 1) * page_size;
  let end = (start + page_size).min(products.len());
  Page {
    items: &products[start..end],
    number,
    page_count,
    total: products.len(),
  }
}

const HEADERS: [&str; 5] = ["ID", "SKU", "QUANTITY", "DESCRIPTION", "STORE"];

pub fn render_page(page: &Page<'_>) -> String {
  let rows: Vec<[String; 5]> = page
    .items
    .iter()
    .map(|p| {
      [
        p.id.to_string(),
        p.sku.clone(),
        p.quantity.to_string(),
        p.description.clone().unwrap_or_default(),
        p.store.clone(),
      ]
    })
    .collect();

  let mut widths = HEADERS.map(str::len);
  for row in &rows {
    for (width, cell) in widths.iter_mut().zip(row) {
      *width = (*width).max(cell.chars().count());
    }
  }

  let mut out = String::new();
  push_line(&mut out, &HEADERS.map(String::from), &widths);
  for row in &rows {
    push_line(&mut out, row, &widths);
  }
  if rows.is_empty() {
    out.push_str("(no products)\n");
  }
  out.push_str(&format!(
    "Page {} of {} ({} products)\n",
    page.number, page.page_count, page.total
  ));
  out
}

fn push_line(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
  let line = cells
    .iter()
    .zip(widths)
    .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
    .collect::<Vec<_>>()
    .join("  ");
  out.push_str(line.trim_end());
  out.push('\n');
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn product(id: i64) -> Product {
    Product {
      id,
      user_id: "u".into(),
      created_at: Utc::now(),
      sku: format!("SKU-{}", id),
      quantity: id * 10,
      description: None,
      store: "LON".into(),
    }
  }

  #[test]
  fn splits_into_pages_of_ten() {
    let all: Vec<_> = (1..=23).map(product).collect();
    let last = paginate(&all, 3, DEFAULT_PAGE_SIZE);
    assert_eq!(last.page_count, 3);
    assert_eq!(last.items.len(), 3);
    assert_eq!(last.items[0].id, 21);
  }

  #[test]
  fn clamps_out_of_range_pages() {
    let all: Vec<_> = (1..=5).map(product).collect();
    assert_eq!(paginate(&all, 9, DEFAULT_PAGE_SIZE).number, 1);
    assert_eq!(paginate(&[], 0, DEFAULT_PAGE_SIZE).items.len(), 0);
  }

  #[test]
  fn renders_aligned_columns_and_footer() {
    let all = vec![product(1), product(12)];
    let text = render_page(&paginate(&all, 1, DEFAULT_PAGE_SIZE));
    let lines: Vec<_> = text.lines().collect();
    assert!(lines[0].starts_with("ID  SKU     QUANTITY"));
    assert!(lines[2].starts_with("12  SKU-12  120"));
    assert_eq!(lines[3], "Page 1 of 1 (2 products)");
  }
}
