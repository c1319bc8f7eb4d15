//! Static configuration: the upstream host, cache location, freshness and
//! concurrency knobs, and the table of known league ids.

use std::path::PathBuf;
use std::time::Duration;

use dugout_fetch::FetchOptions;

/// League ids to sync, grouped by season.
pub const KNOWN_LEAGUES: &[&str] = &[
    // 2025
    "tcayla26m7uvbd9j", // Carl Yastrzemski League
    "efr7mfsfm7uulh5z", // Champs League
    "m2ctep1hm7w3sy8w", // Dick Allen League
    "s1tg5fnum7uvbihw", // Dwight Gooden League
    "voz4vq2hm7uvb50p", // Frank Robinson League
    "3duby9wdm7uvbg6l", // Fred Lynn League
    "eqgdfimrm7uvba9m", // Jimmie Foxx League
    "942toa9tm7uyab7j", // Joe Medwick League
    "7ehvwpnpm7uull8u", // Mickey Mantle League
    "b83d7gnsm7uvb7vl", // Roger Hornsby League
    "jif60ch2m7ql120g", // Mock Draft 1
    // 2024
    "vbq66tzwlt90u0wn", // Champs League
    "lau29fdlltglxf9o", // Dave Stieb League
    "licuwv9rltgljhic", // Dock Ellis League
    "bch2s58mltglvgag", // Gary Carter League
    "wjr4x6cwltgm29pk", // Hank Aaron League
    "lr1l35tjltglswc2", // Honus Wagner League
    "fc6aucqkltglmsze", // Pee Wee Reese League
    "dni9kexbltgm0myz", // Stan Musial League
    "l44bp72nltglg4mf", // Ted Williams League
    "2ozvvpnzltglr1ht", // Ty Cobb League
    "i706amybltjp2k78", // Willie Mays League
    "lt863x0xlt912y2j", // Mock Draft A
    "gdbkakpolt90wqci", // Mock Draft B
    // 2023
    "jjdx7yonlf7kocfz", // Champs League
    "zmktszyulf7lg617", // Eckersley League
    "ijsu1v16lf7mfhll", // Koufax League
    "8fghinaalf7lryh5", // Maddux League
    "5wxxh74wlf7m57gg", // Martinez League
    "mzdd4ysmlf7lydv1", // Ryan League
    // 2022
    "8yqaz060l0ofblha", // Champs League
    "ixvd2dlil0r8ray1", // Clemens League
    "vhioum1ll0r8rpqw", // Gibson League
    "jxoa9dq9l0r8rgli", // McCovey League
    "8k8at6ill0q94oyc", // Ortiz League
    // 2021
    "y8q1j409kmeel9cp", // Bonds League
    "h0nia07fkmedpvk2", // Griffey League
    "6qy7dqwakmici8im", // Ichiro League
    "i8a6jclykmefo93i", // Pujols League
];

pub struct Config {
    pub base_url: String,
    pub sport: String,
    pub cache_dir: PathBuf,
    pub leagues: Vec<String>,
    pub options: FetchOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.fantrax.com".to_string(),
            sport: "MLB".to_string(),
            cache_dir: PathBuf::from("data/.cache"),
            leagues: KNOWN_LEAGUES.iter().map(|s| s.to_string()).collect(),
            options: FetchOptions::default()
                .ttl(Duration::from_secs(86_400))
                .max_concurrent(5)
                .max_attempts(3)
                .timeout(Duration::from_secs(10)),
        }
    }
}
