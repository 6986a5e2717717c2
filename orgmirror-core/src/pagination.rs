//! Page-walking shared by the source and mirror inventory fetchers.

/// Fetch pages `1, 2, 3, …` until one comes back empty or shorter than
/// `page_size`, concatenating the items in order.
///
/// `between_pages` runs after every full page, before the next request, so
/// callers can insert a pacing delay. The first error aborts the walk; no
/// partial listing is returned.
pub fn collect_pages<T, E, F, B>(
    page_size: usize,
    mut fetch_page: F,
    mut between_pages: B,
) -> Result<Vec<T>, E>
where
    F: FnMut(u32) -> Result<Vec<T>, E>,
    B: FnMut(),
{
    let mut items = Vec::new();
    let mut page = 1;
    loop {
        let batch = fetch_page(page)?;
        let len = batch.len();
        items.extend(batch);
        if len == 0 || len < page_size {
            return Ok(items);
        }
        between_pages();
        page += 1;
    }
}
