//! Static airline and airport name tables.
//!
//! Lookups that miss degrade to the raw code, so callers can always display something.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Airport {
    pub icao: &'static str,
    pub iata: &'static str,
    pub name: &'static str,
    pub city: &'static str,
}

const fn airport(
    icao: &'static str,
    iata: &'static str,
    name: &'static str,
    city: &'static str,
) -> Airport {
    Airport {
        icao,
        iata,
        name,
        city,
    }
}

static AIRLINES: &[(&str, &str)] = &[
    ("AAL", "American Airlines"),
    ("ACA", "Air Canada"),
    ("AFR", "Air France"),
    ("AIC", "Air India"),
    ("ANA", "All Nippon Airways"),
    ("ASA", "Alaska Airlines"),
    ("AUA", "Austrian Airlines"),
    ("BAW", "British Airways"),
    ("CPA", "Cathay Pacific"),
    ("DAL", "Delta Air Lines"),
    ("DLH", "Lufthansa"),
    ("EIN", "Aer Lingus"),
    ("EJU", "easyJet Europe"),
    ("ETD", "Etihad Airways"),
    ("EZY", "easyJet"),
    ("FDX", "FedEx Express"),
    ("IBE", "Iberia"),
    ("JAL", "Japan Airlines"),
    ("JBU", "JetBlue Airways"),
    ("KLM", "KLM Royal Dutch Airlines"),
    ("QFA", "Qantas"),
    ("QTR", "Qatar Airways"),
    ("RYR", "Ryanair"),
    ("SAS", "Scandinavian Airlines"),
    ("SIA", "Singapore Airlines"),
    ("SKW", "SkyWest Airlines"),
    ("SWA", "Southwest Airlines"),
    ("SWR", "Swiss International Air Lines"),
    ("THY", "Turkish Airlines"),
    ("UAE", "Emirates"),
    ("UAL", "United Airlines"),
    ("UPS", "UPS Airlines"),
    ("VIR", "Virgin Atlantic"),
    ("VLG", "Vueling"),
    ("WZZ", "Wizz Air"),
];

static AIRPORTS: &[Airport] = &[
    airport("CYYZ", "YYZ", "Toronto Pearson", "Toronto"),
    airport("EDDF", "FRA", "Frankfurt am Main", "Frankfurt"),
    airport("EDDM", "MUC", "Munich", "Munich"),
    airport("EGCC", "MAN", "Manchester", "Manchester"),
    airport("EGKK", "LGW", "Gatwick", "London"),
    airport("EGLC", "LCY", "London City", "London"),
    airport("EGLL", "LHR", "Heathrow", "London"),
    airport("EGSS", "STN", "Stansted", "London"),
    airport("EHAM", "AMS", "Schiphol", "Amsterdam"),
    airport("EIDW", "DUB", "Dublin", "Dublin"),
    airport("LEBL", "BCN", "Barcelona-El Prat", "Barcelona"),
    airport("LEMD", "MAD", "Adolfo Suárez Madrid-Barajas", "Madrid"),
    airport("LFPG", "CDG", "Charles de Gaulle", "Paris"),
    airport("LIRF", "FCO", "Leonardo da Vinci-Fiumicino", "Rome"),
    airport("LSZH", "ZRH", "Zurich", "Zurich"),
    airport("LTFM", "IST", "Istanbul", "Istanbul"),
    airport("KATL", "ATL", "Hartsfield-Jackson Atlanta", "Atlanta"),
    airport("KBOS", "BOS", "Logan", "Boston"),
    airport("KDEN", "DEN", "Denver", "Denver"),
    airport("KDFW", "DFW", "Dallas/Fort Worth", "Dallas"),
    airport("KJFK", "JFK", "John F. Kennedy", "New York"),
    airport("KLAX", "LAX", "Los Angeles", "Los Angeles"),
    airport("KORD", "ORD", "O'Hare", "Chicago"),
    airport("KSEA", "SEA", "Seattle-Tacoma", "Seattle"),
    airport("KSFO", "SFO", "San Francisco", "San Francisco"),
    airport("OMDB", "DXB", "Dubai", "Dubai"),
    airport("OTHH", "DOH", "Hamad", "Doha"),
    airport("RJTT", "HND", "Haneda", "Tokyo"),
    airport("VHHH", "HKG", "Hong Kong", "Hong Kong"),
    airport("WSSS", "SIN", "Changi", "Singapore"),
    airport("YSSY", "SYD", "Kingsford Smith", "Sydney"),
];

/// Airline name from the 3-letter ICAO designator that prefixes a callsign.
pub fn airline_for_callsign(callsign: &str) -> Option<&'static str> {
    let callsign = callsign.trim();
    let prefix = callsign.get(..3)?;
    if !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let prefix = prefix.to_ascii_uppercase();
    AIRLINES
        .iter()
        .find(|(code, _)| *code == prefix)
        .map(|(_, name)| *name)
}

/// Airport by 4-letter ICAO or 3-letter IATA code, case-insensitive.
pub fn find_airport(code: &str) -> Option<&'static Airport> {
    let code = code.trim().to_ascii_uppercase();
    match code.len() {
        4 => AIRPORTS.iter().find(|a| a.icao == code),
        3 => AIRPORTS.iter().find(|a| a.iata == code),
        _ => None,
    }
}

/// "Name (City)" for a known airport, the raw code otherwise.
pub fn airport_display(code: &str) -> String {
    match find_airport(code) {
        Some(airport) if airport.name == airport.city => airport.name.to_string(),
        Some(airport) => format!("{} ({})", airport.name, airport.city),
        None => code.trim().to_string(),
    }
}

pub fn airline_display(callsign: &str) -> String {
    airline_for_callsign(callsign)
        .map(str::to_string)
        .unwrap_or_else(|| callsign.trim().to_string())
}
