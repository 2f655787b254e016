//! Genre taxonomy normalization.
//!
//! Upstream tags are free-form user labels. Only tags listed in the lexicon
//! count as genres; everything else (formats, regions, years, source-material
//! labels, unknown tags) is dropped. The taxonomy is closed: a tag that looks
//! like a genre but is absent from the lexicon never reaches the output.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

/// Raw tag -> canonical genre.
const LEXICON: &[(&str, &str)] = &[
    // Sci-Fi
    ("SF", "科幻"),
    ("Science Fiction", "科幻"),
    ("科幻", "科幻"),
    // Action
    ("战斗", "动作"),
    ("Action", "动作"),
    ("动作", "动作"),
    ("格斗", "动作"),
    // Romance
    ("恋爱", "爱情"),
    ("Romance", "爱情"),
    ("爱情", "爱情"),
    ("纯爱", "爱情"),
    // Comedy
    ("搞笑", "喜剧"),
    ("Comedy", "喜剧"),
    ("喜剧", "喜剧"),
    // Slice of life
    ("日常", "日常"),
    ("Slice of Life", "日常"),
    // School
    ("校园", "校园"),
    ("School", "校园"),
    ("学园", "校园"),
    // Fantasy
    ("奇幻", "奇幻"),
    ("Fantasy", "奇幻"),
    ("异世界", "奇幻"),
    ("魔法", "奇幻"),
    ("穿越", "奇幻"),
    // Adventure
    ("冒险", "冒险"),
    ("Adventure", "冒险"),
    // Mystery / thriller / horror
    ("悬疑", "悬疑"),
    ("Mystery", "悬疑"),
    ("推理", "悬疑"),
    ("惊悚", "惊悚"),
    ("Thriller", "惊悚"),
    ("恐怖", "恐怖"),
    ("Horror", "恐怖"),
    // Sports
    ("运动", "运动"),
    ("Sports", "运动"),
    ("竞技", "运动"),
    // Mecha
    ("机战", "机战"),
    ("Mecha", "机战"),
    ("萝卜", "机战"),
    // Music
    ("音乐", "音乐"),
    ("Music", "音乐"),
    ("歌舞", "音乐"),
    ("偶像", "音乐"),
    // Mood
    ("治愈", "治愈"),
    ("治愈系", "治愈"),
    ("致郁", "致郁"),
    ("致郁系", "致郁"),
    // Relationships
    ("百合", "百合"),
    ("GL", "百合"),
    ("耽美", "耽美"),
    ("BL", "耽美"),
    ("后宫", "后宫"),
    ("逆后宫", "逆后宫"),
    // Other
    ("励志", "励志"),
    ("历史", "历史"),
    ("战争", "战争"),
    ("犯罪", "犯罪"),
    ("职场", "职场"),
    ("萌", "萌系"),
    ("萌系", "萌系"),
];

const EXCLUDED: &[&str] = &[
    // Broadcast formats
    "TV", "OVA", "OAD", "WEB", "TVA", "TV动画", "剧场版", "电影", "Movie", "Special", "特别篇",
    // Countries and regions
    "日本", "中国", "美国", "国产", "日本动画", "欧美", "韩国", "国产动画", "欧美动画",
    // Years
    "2006", "2007", "2008", "2009", "2010", "2011", "2012", "2013", "2014", "2015", "2016",
    "2017", "2018", "2019", "2020", "2021", "2022", "2023", "2024", "2025", "2026", "2027",
    // Year ranges
    "2020-2029", "2010-2019", "2000-2009",
    // Months
    "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
    "1月新番", "4月新番", "7月新番", "10月新番",
    // Season labels
    "2024年", "2023年", "2024冬", "2024春", "2024夏", "2024秋",
    // Source material
    "原创", "漫改", "小说改", "游戏改", "轻小说改", "漫画改", "改编", "原作", "Manga",
    "Light Novel",
    // Meta
    "续作", "补番", "童年", "怀旧", "新番", "完结", "长篇", "短篇", "泡面番", "连载中",
];

const MONTH_MARKER: char = '月';
const YEAR_MARKER: char = '年';

struct Tables {
    lexicon: HashMap<&'static str, &'static str>,
    excluded: HashSet<&'static str>,
}

impl Tables {
    fn get() -> &'static Self {
        static INSTANCE: OnceLock<Tables> = OnceLock::new();
        INSTANCE.get_or_init(|| Self {
            lexicon: LEXICON.iter().copied().collect(),
            excluded: EXCLUDED.iter().copied().collect(),
        })
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_numeric)
}

/// Returns true when `tag` is known noise: a listed label, a bare year, a year
/// range, a month label or a year label.
#[must_use]
pub fn is_excluded(tag: &str) -> bool {
    if Tables::get().excluded.contains(tag) {
        return true;
    }

    if is_digits(tag) && tag.chars().count() == 4 {
        return true;
    }

    if let Some((from, to)) = tag.split_once('-')
        && !to.contains('-')
        && is_digits(from)
        && is_digits(to)
    {
        return true;
    }

    let has_digit = tag.chars().any(char::is_numeric);

    if tag.contains(MONTH_MARKER) && has_digit {
        return true;
    }

    tag.ends_with(YEAR_MARKER) && has_digit
}

/// Looks up the canonical genre for a raw tag, ignoring exclusion rules.
#[must_use]
pub fn canonical_genre(tag: &str) -> Option<&'static str> {
    Tables::get().lexicon.get(tag).copied()
}

/// Maps `(name, usage count)` tag pairs to a sorted, deduplicated genre list.
///
/// Tags nobody applied (count 0) and excluded tags are dropped before the
/// lexicon lookup; tags missing from the lexicon are dropped silently.
pub fn normalize_genres<'a, I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    tags.into_iter()
        .filter(|&(_, count)| count > 0)
        .filter(|&(name, _)| !is_excluded(name))
        .filter_map(|(name, _)| canonical_genre(name))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
