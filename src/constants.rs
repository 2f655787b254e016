pub mod files {

    pub const MANIFEST_FILE: &str = "manifest.json";

    pub const DEFAULT_OUTPUT_DIR: &str = "data_cn";
}

pub mod infobox {

    pub const STUDIO_KEYS: &[&str] = &["动画制作", "制作"];

    pub const SOURCE_KEYS: &[&str] = &["原作"];
}

pub mod history {

    pub const DEFAULT_START_YEAR: i32 = 2006;
}

pub mod intervals {

    pub const PAGE_DELAY_MS: u64 = 500;

    pub const ITEM_DELAY_MS: u64 = 500;
}
