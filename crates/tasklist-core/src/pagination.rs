/// Page numbers to offer as links, at most `max_links` of them.
///
/// When every page fits, all pages are returned. Otherwise the window is
/// centred on `current` and slid (never shrunk) so it stays inside
/// `1..=total_pages`.
#[must_use]
pub fn page_window(current: usize, total_pages: usize, max_links: usize) -> Vec<usize> {
    if max_links == 0 || total_pages == 0 {
        return Vec::new();
    }
    if total_pages <= max_links {
        return (1..=total_pages).collect();
    }
    let last_start = total_pages - max_links + 1;
    let start = current.saturating_sub(max_links / 2).clamp(1, last_start);
    (start..start + max_links).collect()
}
