//! API endpoint URL builders

/// Build the paginated animal listing URL
pub fn animals_page_url(base_url: &str, page: u32) -> String {
    format!("{}/animals/v1/animals?page={}", base_url, page)
}

/// Build the animal detail URL
pub fn animal_detail_url(base_url: &str, id: u64) -> String {
    format!("{}/animals/v1/animals/{}", base_url, id)
}

/// Build the home (destination) URL
pub fn home_url(base_url: &str) -> String {
    format!("{}/animals/v1/home", base_url)
}
