// Shared fixtures for integration tests

#![allow(dead_code)]

use kompass_leagues::{ClubRecord, ClubSet};

/// 80 Regionalliga-level clubs with approximate stadium coordinates
pub const GERMANY_80: [(&str, f64, f64); 80] = [
    // Nord
    ("Hannover 96 II", 52.360, 9.731),
    ("Kickers Emden", 53.367, 7.206),
    ("SV Drochtersen/Assel", 53.710, 9.387),
    ("Werder Bremen II", 53.066, 8.838),
    ("1. FC Phönix Lübeck", 53.853, 10.650),
    ("SV Meppen", 52.692, 7.297),
    ("VfB Lübeck", 53.871, 10.661),
    ("Hamburger SV II", 53.587, 9.899),
    ("Blau-Weiß Lohne", 52.667, 8.237),
    ("FC St. Pauli II", 53.554, 9.968),
    ("VfB Oldenburg", 53.143, 8.214),
    ("Eintracht Norderstedt", 53.705, 9.991),
    ("SC Weiche Flensburg 08", 54.770, 9.437),
    ("SSV Jeddeloh", 53.180, 8.010),
    ("Bremer SV", 53.080, 8.823),
    ("HSC Hannover", 52.385, 9.752),
    ("FSV Schöningen", 52.139, 10.963),
    ("Altona 93", 53.566, 9.920),
    // Nordost
    ("1. FC Lokomotive Leipzig", 51.306, 12.424),
    ("Hallescher FC", 51.491, 11.982),
    ("FC Rot-Weiß Erfurt", 50.963, 11.040),
    ("FSV Zwickau", 50.703, 12.488),
    ("FC Carl Zeiss Jena", 50.933, 11.580),
    ("Greifswalder FC", 54.093, 13.387),
    ("Chemnitzer FC", 50.812, 12.903),
    ("BFC Dynamo", 52.550, 13.413),
    ("VSG Altglienicke", 52.409, 13.550),
    ("Hertha BSC II", 52.515, 13.239),
    ("ZFC Meuselwitz", 51.048, 12.295),
    ("Hertha 03 Zehlendorf", 52.432, 13.258),
    ("SV Babelsberg 03", 52.393, 13.116),
    ("BSG Chemie Leipzig", 51.351, 12.330),
    ("FSV 63 Luckenwalde", 52.086, 13.168),
    ("FC Eilenburg", 51.460, 12.634),
    ("BFC Preussen", 52.437, 13.364),
    ("1. FC Magdeburg II", 52.125, 11.671),
    // West
    ("Borussia Dortmund II", 51.493, 7.452),
    ("FC Gütersloh", 51.904, 8.391),
    ("Sportfreunde Lotte", 52.283, 7.917),
    ("Rot-Weiß Oberhausen", 51.490, 6.871),
    ("SV Rödinghausen", 52.253, 8.484),
    ("SC Fortuna Köln", 50.895, 6.964),
    ("Borussia Mönchengladbach II", 51.175, 6.385),
    ("1. FC Köln II", 50.934, 6.876),
    ("SC Paderborn 07 II", 51.731, 8.711),
    ("1. FC Bocholt", 51.837, 6.617),
    ("Fortuna Düsseldorf II", 51.262, 6.734),
    ("SC Wiedenbrück", 51.838, 8.314),
    ("Wuppertaler SV", 51.254, 7.151),
    ("FC Schalke 04 II", 51.556, 7.068),
    ("Bonner SC", 50.717, 7.143),
    ("SSVg Velbert", 51.341, 7.043),
    ("Sportfreunde Siegen", 50.873, 8.017),
    ("VfL Bochum II", 51.490, 7.236),
    // Bayern
    ("SpVgg Unterhaching", 48.068, 11.612),
    ("TSV Buchbach", 48.317, 12.267),
    ("SpVgg Greuther Fürth II", 49.487, 10.999),
    ("FC Bayern München II", 48.112, 11.575),
    ("SpVgg Bayreuth", 49.961, 11.584),
    ("Würzburger Kickers", 49.783, 9.918),
    ("Wacker Burghausen", 48.170, 12.833),
    ("DJK Vilzing", 49.226, 12.681),
    ("FV Illertissen", 48.223, 10.099),
    ("SpVgg Ansbach 09", 49.302, 10.570),
    ("1. FC Nürnberg II", 49.426, 11.126),
    ("FC Augsburg II", 48.323, 10.886),
    ("TSV Aubstadt", 50.333, 10.434),
    ("FC Memmingen", 47.986, 10.184),
    // Südwest
    ("SV Sandhausen", 49.343, 8.658),
    ("Kickers Offenbach", 50.099, 8.783),
    ("SGV Freiberg", 48.928, 9.192),
    ("TSV Steinbach Haiger", 50.754, 8.208),
    ("Stuttgarter Kickers", 48.784, 9.213),
    ("FSV Frankfurt", 50.120, 8.726),
    ("SC Freiburg II", 47.988, 7.896),
    ("FC 08 Homburg", 49.316666666667, 7.3333333333333),
    ("KSV Hessen Kassel", 51.298, 9.467),
    ("Fulda", 50.555809, 9.680845),
    ("FC-Astoria Walldorf", 49.307, 8.646),
    ("SV Eintracht Trier", 49.759, 6.641),
];

pub fn germany_records() -> Vec<ClubRecord> {
    GERMANY_80
        .iter()
        .map(|&(name, lat, lon)| ClubRecord::new(name, lat, lon))
        .collect()
}

pub fn germany_clubs() -> ClubSet {
    ClubSet::from_records(germany_records()).unwrap()
}
