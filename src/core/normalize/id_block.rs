//! Identity document selection
//!
//! The source packs every identity document of a person into one sub-field:
//! documents are separated by `|` and their attributes by `:`. Attribute 3 is
//! the issuing country and attribute 4 the document number.

/// Number of values the ID block contributes to a detail record
pub const ID_BLOCK_WIDTH: usize = 6;

const COUNTRY: usize = 3;
const NUMBER: usize = 4;

/// Picks one identity document and returns its first six attributes
///
/// A home-country document with a number wins over any foreign one; among
/// equals the first listed wins. Organizations never carry an ID block.
pub fn parse_id_block(raw: &str, is_organization: bool, home_country: &str) -> Vec<String> {
    let mut block: Vec<String> = Vec::with_capacity(ID_BLOCK_WIDTH);

    if !is_organization && !raw.is_empty() {
        let tuples: Vec<Vec<&str>> = raw.split('|').map(|t| t.split(':').collect()).collect();

        let has_number = |t: &&Vec<&str>| t.get(NUMBER).is_some_and(|n| !n.is_empty());
        let chosen = tuples
            .iter()
            .filter(|t| t.get(COUNTRY) == Some(&home_country))
            .find(has_number)
            .or_else(|| {
                tuples
                    .iter()
                    .filter(|t| t.get(COUNTRY).is_some_and(|c| *c != home_country))
                    .find(has_number)
            });

        if let Some(tuple) = chosen {
            block.extend(tuple.iter().take(ID_BLOCK_WIDTH).map(|v| v.to_string()));
        }
    }

    block.resize(ID_BLOCK_WIDTH, String::new());
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_home_country_wins() {
        let block = parse_id_block("1:2:3:USA:X|1:2:3:CAN:Y", false, "USA");
        assert_eq!(block, strs(&["1", "2", "3", "USA", "X", ""]));
    }

    #[test]
    fn test_home_country_wins_when_listed_second() {
        let block = parse_id_block("DL:9:x:CAN:Y:e|PP:1:x:USA:X:f", false, "USA");
        assert_eq!(block, strs(&["PP", "1", "x", "USA", "X", "f"]));
    }

    #[test]
    fn test_foreign_used_without_home() {
        let block = parse_id_block("1:2:3:CAN:Y", false, "USA");
        assert_eq!(block, strs(&["1", "2", "3", "CAN", "Y", ""]));
    }

    #[test]
    fn test_foreign_used_when_home_has_no_number() {
        let block = parse_id_block("a:b:c:USA:|d:e:f:MEX:N1", false, "USA");
        assert_eq!(block, strs(&["d", "e", "f", "MEX", "N1", ""]));
    }

    #[test]
    fn test_first_qualifying_home_tuple() {
        let block = parse_id_block("a:b:c:USA:|d:e:f:USA:N2|g:h:i:USA:N3", false, "USA");
        assert_eq!(block[4], "N2");
    }

    #[test]
    fn test_truncates_to_six() {
        let block = parse_id_block("1:2:3:USA:5:6:7:8", false, "USA");
        assert_eq!(block, strs(&["1", "2", "3", "USA", "5", "6"]));
    }

    #[test]
    fn test_other_home_country() {
        let block = parse_id_block("1:2:3:USA:X|1:2:3:CAN:Y", false, "CAN");
        assert_eq!(block[4], "Y");
    }

    #[test]
    fn test_nothing_qualifies() {
        let empty = vec![String::new(); ID_BLOCK_WIDTH];
        assert_eq!(parse_id_block("", false, "USA"), empty);
        assert_eq!(parse_id_block("1:2:3:USA:", false, "USA"), empty);
        assert_eq!(parse_id_block("1:2", false, "USA"), empty);
        assert_eq!(parse_id_block("garbage", false, "USA"), empty);
    }

    #[test]
    fn test_organization_always_empty() {
        let block = parse_id_block("1:2:3:USA:X", true, "USA");
        assert_eq!(block, vec![String::new(); ID_BLOCK_WIDTH]);
    }
}
