use std::path::Path;

use super::*;

fn site(entry_url: &str, category_id: u32, site_type: SiteType) -> SiteConfig {
    SiteConfig {
        entry_url: entry_url.to_string(),
        category_id,
        site_type,
    }
}

#[test]
fn site_type_parses_snake_case_names() {
    for t in SiteType::ALL {
        assert_eq!(t.as_str().parse::<SiteType>().unwrap(), t);
    }
}

#[test]
fn site_type_rejects_unknown_name() {
    let err = "amazon".parse::<SiteType>().unwrap_err();
    assert!(err.to_string().contains("unknown site type 'amazon'"));
}

#[test]
fn site_type_display_matches_yaml_name() {
    let yaml = serde_yaml::to_string(&SiteType::KyoboBestseller).unwrap();
    assert_eq!(yaml.trim(), SiteType::KyoboBestseller.to_string());
}

#[test]
fn validate_rejects_empty_list() {
    let err = validate_sites(&SitesFile { sites: vec![] }).unwrap_err();
    assert!(err.to_string().contains("at least one site"));
}

#[test]
fn validate_rejects_relative_url() {
    let file = SitesFile {
        sites: vec![site("/sec/tvs/all-tvs/", 1, SiteType::SamsungStore)],
    };
    let err = validate_sites(&file).unwrap_err();
    assert!(err.to_string().contains("absolute http(s) URL"));
}

#[test]
fn validate_rejects_zero_category() {
    let file = SitesFile {
        sites: vec![site("https://www.ssfshop.com/list", 0, SiteType::SsfShop)],
    };
    let err = validate_sites(&file).unwrap_err();
    assert!(err.to_string().contains("category_id 0"));
}

#[test]
fn validate_rejects_duplicate_entry() {
    let file = SitesFile {
        sites: vec![
            site("https://www.daisomall.co.kr/search?q=a", 6, SiteType::DaisoSearch),
            site("https://www.daisomall.co.kr/search?q=a", 6, SiteType::DaisoSearch),
        ],
    };
    let err = validate_sites(&file).unwrap_err();
    assert!(err.to_string().contains("duplicate site"));
}

#[test]
fn validate_allows_same_url_in_two_categories() {
    let file = SitesFile {
        sites: vec![
            site("https://www.daisomall.co.kr/search?q=a", 6, SiteType::DaisoSearch),
            site("https://www.daisomall.co.kr/search?q=a", 7, SiteType::DaisoSearch),
        ],
    };
    assert!(validate_sites(&file).is_ok());
}

#[test]
fn unknown_site_type_fails_to_parse() {
    let yaml = "sites:\n  - entry_url: https://example.com\n    category_id: 1\n    site_type: amazon\n";
    let result: Result<SitesFile, _> = serde_yaml::from_str(yaml);
    assert!(result.is_err());
}

#[test]
fn load_sites_reports_missing_file() {
    let err = load_sites(Path::new("/nonexistent/sites.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::SitesFileIo { .. }));
}

#[test]
fn load_sites_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("sites.yaml");
    assert!(
        path.exists(),
        "sites.yaml missing at {path:?}, required for this test"
    );
    let sites_file = load_sites(&path).expect("failed to load sites.yaml");
    assert_eq!(sites_file.sites.len(), 18);

    let samsung = sites_file
        .sites
        .iter()
        .filter(|s| s.site_type == SiteType::SamsungStore)
        .count();
    assert_eq!(samsung, 12);

    for t in SiteType::ALL {
        assert!(
            sites_file.sites.iter().any(|s| s.site_type == t),
            "sites.yaml has no entry for {t}"
        );
    }
}
