use std::error::Error;
use uistore_scraper::{ProductAvailability, Url};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let url = "https://uk.store.ui.com/uk/en/category/wifi-special-devices/products/utr";
    let availability = ProductAvailability::fetch(Url::parse(url)?).await;
    println!("{:#?}", availability);
    Ok(())
}
