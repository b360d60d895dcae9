use std::path::Path;

use shopseed_core::load_sites;

pub(crate) fn run_sites(path: &Path) -> anyhow::Result<()> {
    let sites_file = load_sites(path)?;
    println!("{} sites in {}", sites_file.sites.len(), path.display());
    for (position, site) in sites_file.sites.iter().enumerate() {
        println!(
            "{:>3}. {:<20} category {:>3}  {}",
            position + 1,
            site.site_type,
            site.category_id,
            site.entry_url
        );
    }
    Ok(())
}
