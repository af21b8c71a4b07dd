//! Curated lookup tables: canonical names, short codes and families.
//!
//! Rule files refer to operating systems, browsers and brands by their
//! display names; these tables map those names to stable short codes and
//! group them into families.

use ahash::AHashMap;
use once_cell::sync::Lazy;

/// Operating systems: short code, canonical name.
pub const OPERATING_SYSTEMS: &[(&str, &str)] = &[
    ("AIX", "AIX"),
    ("AND", "Android"),
    ("AMG", "AmigaOS"),
    ("ATV", "Apple TV"),
    ("ARL", "Arch Linux"),
    ("BEO", "BeOS"),
    ("BLB", "BlackBerry OS"),
    ("QNX", "BlackBerry Tablet OS"),
    ("CES", "CentOS"),
    ("COS", "Chrome OS"),
    ("DEB", "Debian"),
    ("DFB", "DragonFly"),
    ("FED", "Fedora"),
    ("FOS", "Firefox OS"),
    ("FIR", "Fire OS"),
    ("BSD", "FreeBSD"),
    ("GNT", "Gentoo"),
    ("GTV", "Google TV"),
    ("HAI", "Haiku OS"),
    ("HAR", "HarmonyOS"),
    ("HPX", "HP-UX"),
    ("IRI", "IRIX"),
    ("KOS", "KaiOS"),
    ("LIN", "GNU/Linux"),
    ("MAC", "Mac"),
    ("MAE", "Maemo"),
    ("MIN", "Mint"),
    ("MOR", "MorphOS"),
    ("NBS", "NetBSD"),
    ("WII", "Nintendo"),
    ("NDS", "Nintendo Mobile"),
    ("OS2", "OS/2"),
    ("OBS", "OpenBSD"),
    ("PSP", "PlayStation Portable"),
    ("PS3", "PlayStation"),
    ("RHT", "Red Hat"),
    ("SAF", "Sailfish OS"),
    ("SOS", "Solaris"),
    ("SYM", "Symbian"),
    ("SYS", "Symbian OS"),
    ("S40", "Symbian OS Series 40"),
    ("S60", "Symbian OS Series 60"),
    ("SY3", "Symbian^3"),
    ("TIZ", "Tizen"),
    ("UBT", "Ubuntu"),
    ("WAS", "watchOS"),
    ("WIN", "Windows"),
    ("WCE", "Windows CE"),
    ("WIO", "Windows IoT"),
    ("WMO", "Windows Mobile"),
    ("WPH", "Windows Phone"),
    ("WRT", "Windows RT"),
    ("XBX", "Xbox"),
    ("IOS", "iOS"),
    ("WOS", "webOS"),
];

/// Operating system families and the short codes they contain.
pub const OS_FAMILIES: &[(&str, &[&str])] = &[
    ("Android", &["AND", "FIR", "HAR"]),
    ("AmigaOS", &["AMG", "MOR"]),
    ("BlackBerry", &["BLB", "QNX"]),
    ("BeOS", &["BEO", "HAI"]),
    ("Chrome OS", &["COS"]),
    ("Firefox OS", &["FOS", "KOS"]),
    ("Gaming Console", &["WII", "PS3", "XBX"]),
    ("Google TV", &["GTV"]),
    ("IBM", &["OS2"]),
    ("iOS", &["IOS", "ATV", "WAS"]),
    (
        "GNU/Linux",
        &["LIN", "ARL", "DEB", "MIN", "UBT", "FED", "RHT", "GNT", "CES", "SAF"],
    ),
    ("Mac", &["MAC"]),
    ("Mobile Gaming Console", &["PSP", "NDS"]),
    ("Other Mobile", &["WOS", "TIZ", "MAE"]),
    ("Symbian", &["SYM", "SYS", "SY3", "S60", "S40"]),
    ("Unix", &["SOS", "AIX", "HPX", "BSD", "NBS", "OBS", "DFB", "IRI"]),
    ("Windows", &["WIN"]),
    ("Windows Mobile", &["WPH", "WMO", "WCE", "WRT", "WIO"]),
];

/// OS families whose devices are desktops unless proven otherwise.
pub const DESKTOP_OS_FAMILIES: &[&str] = &[
    "AmigaOS",
    "IBM",
    "GNU/Linux",
    "Mac",
    "Unix",
    "Windows",
    "BeOS",
    "Chrome OS",
];

/// Operating systems that imply Apple hardware.
pub const APPLE_OPERATING_SYSTEMS: &[&str] = &["Apple TV", "watchOS", "iOS", "Mac"];

/// Browsers: short code, canonical name.
pub const BROWSERS: &[(&str, &str)] = &[
    ("36", "360 Phone Browser"),
    ("AS", "Android Browser"),
    ("BB", "BlackBerry Browser"),
    ("BR", "Brave"),
    ("CF", "Chrome Frame"),
    ("CH", "Chrome"),
    ("CI", "Chrome Mobile iOS"),
    ("CM", "Chrome Mobile"),
    ("CR", "Chromium"),
    ("DD", "DuckDuckGo Privacy Browser"),
    ("EP", "GNOME Web"),
    ("ES", "Espial TV Browser"),
    ("FE", "Firefox Mobile iOS"),
    ("FF", "Firefox"),
    ("FM", "Firefox Mobile"),
    ("IE", "Internet Explorer"),
    ("IM", "IE Mobile"),
    ("KO", "Konqueror"),
    ("KY", "Kylo"),
    ("MF", "Mobile Safari"),
    ("MI", "Midori"),
    ("MZ", "MIUI Browser"),
    ("NF", "NetFront"),
    ("OI", "Opera Mini"),
    ("OM", "Opera Mobile"),
    ("OP", "Opera"),
    ("PS", "Microsoft Edge"),
    ("PU", "Puffin"),
    ("SB", "Samsung Browser"),
    ("SF", "Safari"),
    ("UC", "UC Browser"),
    ("VI", "Vivaldi"),
    ("YA", "Yandex Browser"),
];

/// Browser families and the short codes they contain.
pub const BROWSER_FAMILIES: &[(&str, &[&str])] = &[
    ("Android Browser", &["AS"]),
    ("BlackBerry Browser", &["BB"]),
    ("Chrome", &["CH", "CM", "CI", "CF", "CR", "BR", "SB", "VI", "YA", "MZ"]),
    ("Firefox", &["FF", "FM", "FE", "KY"]),
    ("Internet Explorer", &["IE", "IM", "PS"]),
    ("Konqueror", &["KO"]),
    ("NetFront", &["NF"]),
    ("Opera", &["OP", "OM", "OI"]),
    ("Safari", &["SF", "MF", "EP", "MI"]),
    ("UC Browser", &["UC"]),
];

/// Browsers that only ship on mobile hardware, by short code.
pub const MOBILE_ONLY_BROWSERS: &[&str] =
    &["36", "PU", "MF", "OI", "OM", "DD", "CI", "FE", "FM", "SB", "IM", "MZ"];

/// Device brands: short code, canonical name.
pub const BRANDS: &[(&str, &str)] = &[
    ("AC", "Acer"),
    ("AM", "Amazon"),
    ("AP", "Apple"),
    ("AU", "Asus"),
    ("BB", "BlackBerry"),
    ("CW", "Cowon"),
    ("DL", "Dell"),
    ("FU", "Fujitsu"),
    ("GA", "Gateway"),
    ("GO", "Google"),
    ("HI", "Hisense"),
    ("HP", "HP"),
    ("HT", "HTC"),
    ("HU", "Huawei"),
    ("JI", "Jio"),
    ("LE", "Lenovo"),
    ("LG", "LG"),
    ("MD", "Medion"),
    ("MI", "MSI"),
    ("MO", "Motorola"),
    ("MS", "Microsoft"),
    ("NI", "Nintendo"),
    ("NK", "Nokia"),
    ("NN", "Nikon"),
    ("ON", "OnePlus"),
    ("OO", "Oppo"),
    ("OU", "OUYA"),
    ("PA", "Panasonic"),
    ("PH", "Philips"),
    ("RE", "Realme"),
    ("SA", "Samsung"),
    ("SO", "Sony"),
    ("TC", "TCL"),
    ("TE", "Tesla"),
    ("TS", "Toshiba"),
    ("VV", "Vivo"),
    ("XI", "Xiaomi"),
    ("ZT", "ZTE"),
];

/// Brand name used by device rules that identify a device type but no
/// manufacturer.
pub const UNKNOWN_BRAND: &str = "Unknown";

struct Index {
    os_short: AHashMap<String, &'static str>,
    os_name: AHashMap<&'static str, &'static str>,
    os_family: AHashMap<&'static str, &'static str>,
    browser_short: AHashMap<String, &'static str>,
    browser_name: AHashMap<&'static str, &'static str>,
    browser_family: AHashMap<&'static str, &'static str>,
    brand_short: AHashMap<String, &'static str>,
    brand_name: AHashMap<String, &'static str>,
}

static INDEX: Lazy<Index> = Lazy::new(|| {
    let mut index = Index {
        os_short: AHashMap::new(),
        os_name: AHashMap::new(),
        os_family: AHashMap::new(),
        browser_short: AHashMap::new(),
        browser_name: AHashMap::new(),
        browser_family: AHashMap::new(),
        brand_short: AHashMap::new(),
        brand_name: AHashMap::new(),
    };
    for &(short, name) in OPERATING_SYSTEMS {
        index.os_short.insert(name.to_lowercase(), short);
        index.os_name.insert(short, name);
    }
    for &(family, shorts) in OS_FAMILIES {
        for &short in shorts {
            index.os_family.insert(short, family);
        }
    }
    for &(short, name) in BROWSERS {
        index.browser_short.insert(name.to_lowercase(), short);
        index.browser_name.insert(short, name);
    }
    for &(family, shorts) in BROWSER_FAMILIES {
        for &short in shorts {
            index.browser_family.insert(short, family);
        }
    }
    for &(short, name) in BRANDS {
        index.brand_short.insert(name.to_lowercase(), short);
        index.brand_name.insert(name.to_lowercase(), name);
    }
    index
});

/// Resolve an OS name (case-insensitively) to its short code and
/// canonical spelling.
pub fn os_by_name(name: &str) -> Option<(&'static str, &'static str)> {
    let short = *INDEX.os_short.get(&name.to_lowercase())?;
    let canonical = *INDEX.os_name.get(short)?;
    Some((short, canonical))
}

/// Family of the OS with the given short code.
pub fn os_family(short: &str) -> Option<&'static str> {
    INDEX.os_family.get(short).copied()
}

/// Whether the OS family counts as a desktop platform.
pub fn is_desktop_os_family(family: &str) -> bool {
    DESKTOP_OS_FAMILIES.contains(&family)
}

/// Resolve a browser name (case-insensitively) to its short code and
/// canonical spelling.
pub fn browser_by_name(name: &str) -> Option<(&'static str, &'static str)> {
    let short = *INDEX.browser_short.get(&name.to_lowercase())?;
    let canonical = *INDEX.browser_name.get(short)?;
    Some((short, canonical))
}

/// Family of the browser with the given short code.
pub fn browser_family(short: &str) -> Option<&'static str> {
    INDEX.browser_family.get(short).copied()
}

/// Whether the browser with the given short code is mobile-only.
pub fn is_mobile_only_browser(short: &str) -> bool {
    MOBILE_ONLY_BROWSERS.contains(&short)
}

/// Resolve a brand name (case-insensitively) to its canonical spelling.
pub fn brand_by_name(name: &str) -> Option<&'static str> {
    INDEX.brand_name.get(&name.to_lowercase()).copied()
}

/// Short code of a brand.
pub fn brand_short(name: &str) -> Option<&'static str> {
    INDEX.brand_short.get(&name.to_lowercase()).copied()
}
