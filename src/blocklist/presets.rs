//! Built-in blocklist presets: curated categories, the quick-toggle
//! sites, and the page-title patterns used when no URL is available.

pub struct PresetCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub patterns: &'static [&'static str],
    pub default_enabled: bool,
}

/// Each pattern covers both web URLs and desktop app window titles
/// where applicable. Patterns with a dot are matched as domains,
/// the rest as app-name substrings.
pub static PRESET_CATEGORIES: [PresetCategory; 5] = [
    PresetCategory {
        id: "social_media",
        name: "Social Media",
        description: "Social networking sites and apps",
        patterns: &[
            "facebook.com",
            "fb.com",
            "messenger.com",
            "twitter.com",
            // More specific than "x.com" to avoid matching netflix.com
            "://x.com",
            "instagram.com",
            "tiktok.com",
            "reddit.com",
            "linkedin.com",
            "snapchat.com",
            "web.snapchat.com",
            "pinterest.com",
            "tumblr.com",
            "threads.net",
            "bereal.com",
        ],
        default_enabled: true,
    },
    PresetCategory {
        id: "video_streaming",
        name: "Video Streaming",
        description: "Video and streaming platforms",
        patterns: &[
            "youtube.com",
            "youtu.be",
            "netflix.com",
            "Netflix",
            "hulu.com",
            "disneyplus.com",
            "Disney+",
            "primevideo.com",
            "amazon.com/video",
            "Prime Video",
            "twitch.tv",
            "Twitch",
            "vimeo.com",
            "dailymotion.com",
            "crunchyroll.com",
            "max.com",
            "hbomax.com",
            "peacocktv.com",
            "paramountplus.com",
            "tv.apple.com",
        ],
        default_enabled: true,
    },
    PresetCategory {
        id: "gaming",
        name: "Gaming",
        description: "Gaming platforms, sites, and apps",
        patterns: &[
            "Steam",
            "steampowered.com",
            "store.steampowered.com",
            "Discord",
            "discord.com",
            "discord.gg",
            "Epic Games",
            "epicgames.com",
            "Roblox",
            "roblox.com",
            "Minecraft",
            "minecraft.net",
            "xbox.com",
            "Xbox",
            "playstation.com",
            "itch.io",
            "gog.com",
            "GOG Galaxy",
            "battle.net",
            "Battle.net",
            "leagueoflegends.com",
            "League of Legends",
            "playvalorant.com",
            "VALORANT",
            "origin.com",
            "ea.com",
            "EA app",
        ],
        default_enabled: true,
    },
    PresetCategory {
        id: "messaging",
        name: "Messaging",
        description: "Chat and messaging apps (some may be productive)",
        patterns: &[
            "WhatsApp",
            "web.whatsapp.com",
            "whatsapp.com",
            "Telegram",
            "web.telegram.org",
            "telegram.org",
            "Messenger",
            "Signal",
            "signal.org",
            "WeChat",
            "wechat.com",
            "Viber",
            "viber.com",
        ],
        default_enabled: false,
    },
    PresetCategory {
        id: "news_entertainment",
        name: "News & Entertainment",
        description: "News sites and entertainment portals",
        patterns: &[
            "buzzfeed.com",
            "9gag.com",
            "imgur.com",
            "boredpanda.com",
            "tmz.com",
            "thechive.com",
            "espn.com",
            "bleacherreport.com",
            "sportskeeda.com",
            "knowyourmeme.com",
            "memedroid.com",
            "eonline.com",
            "perezhilton.com",
        ],
        default_enabled: false,
    },
];

pub struct QuickSite {
    pub id: &'static str,
    pub name: &'static str,
    pub patterns: &'static [&'static str],
}

/// The six most common distraction sites, exposed as one-tap toggles.
pub static QUICK_SITES: [QuickSite; 6] = [
    QuickSite {
        id: "instagram",
        name: "instagram.com",
        patterns: &["instagram.com"],
    },
    QuickSite {
        id: "youtube",
        name: "youtube.com",
        patterns: &["youtube.com"],
    },
    QuickSite {
        id: "netflix",
        name: "netflix.com",
        patterns: &["netflix.com"],
    },
    QuickSite {
        id: "reddit",
        name: "reddit.com",
        patterns: &["reddit.com"],
    },
    QuickSite {
        id: "tiktok",
        name: "tiktok.com",
        patterns: &["tiktok.com"],
    },
    QuickSite {
        id: "twitter",
        name: "twitter.com / x.com",
        patterns: &["twitter.com", "://x.com", "/x.com/"],
    },
];

pub struct SiteTitlePattern {
    pub site: &'static str,
    pub variations: &'static [&'static str],
    /// Patterns that must match the exact end of a title. Used for
    /// X/Twitter, whose titles always end "... / X", so the single
    /// letter never has to be matched as a substring.
    pub exact_end_patterns: &'static [&'static str],
}

/// Page-title matching covers structural positions only (exact title,
/// start or end segment around a separator). Guards against false
/// positives like "Share to Twitter" inside an article title.
pub static SITE_TITLE_PATTERNS: [SiteTitlePattern; 14] = [
    SiteTitlePattern {
        site: "youtube",
        variations: &["youtube", "yt"],
        exact_end_patterns: &[],
    },
    SiteTitlePattern {
        site: "facebook",
        variations: &["facebook", "fb"],
        exact_end_patterns: &[],
    },
    SiteTitlePattern {
        site: "instagram",
        variations: &["instagram", "ig"],
        exact_end_patterns: &[],
    },
    SiteTitlePattern {
        site: "twitter",
        variations: &["twitter"],
        exact_end_patterns: &[" / x"],
    },
    SiteTitlePattern {
        site: "tiktok",
        variations: &["tiktok", "tik tok"],
        exact_end_patterns: &[],
    },
    SiteTitlePattern {
        site: "reddit",
        variations: &["reddit"],
        exact_end_patterns: &[],
    },
    SiteTitlePattern {
        site: "netflix",
        variations: &["netflix"],
        exact_end_patterns: &[],
    },
    SiteTitlePattern {
        site: "twitch",
        variations: &["twitch"],
        exact_end_patterns: &[],
    },
    SiteTitlePattern {
        site: "discord",
        variations: &["discord"],
        exact_end_patterns: &[],
    },
    SiteTitlePattern {
        site: "whatsapp",
        variations: &["whatsapp"],
        exact_end_patterns: &[],
    },
    SiteTitlePattern {
        site: "telegram",
        variations: &["telegram"],
        exact_end_patterns: &[],
    },
    SiteTitlePattern {
        site: "snapchat",
        variations: &["snapchat"],
        exact_end_patterns: &[],
    },
    SiteTitlePattern {
        site: "pinterest",
        variations: &["pinterest"],
        exact_end_patterns: &[],
    },
    SiteTitlePattern {
        site: "linkedin",
        variations: &["linkedin"],
        exact_end_patterns: &[],
    },
];

/// Gadget kinds the camera classifier can be asked to watch for.
pub const GADGET_IDS: [&str; 5] = ["phone", "tablet", "controller", "tv", "wearable"];

pub const DEFAULT_ENABLED_GADGETS: [&str; 1] = ["phone"];

pub fn category(id: &str) -> Option<&'static PresetCategory> {
    PRESET_CATEGORIES.iter().find(|c| c.id == id)
}

pub fn quick_site(id: &str) -> Option<&'static QuickSite> {
    QUICK_SITES.iter().find(|s| s.id == id)
}

pub fn title_patterns(site: &str) -> Option<&'static SiteTitlePattern> {
    SITE_TITLE_PATTERNS.iter().find(|p| p.site == site)
}
