/// Age bucket character. Rules are evaluated in ascending order so the later
/// bands take precedence at their lower boundary.
pub fn age_code(age: u8) -> char {
    let mut code = '1';
    if (35..=44).contains(&age) {
        code = '2';
    }
    if age >= 45 {
        code = '3';
    }
    code
}

/// Binary gender character: only the exact literal `Female` maps to `F`,
/// every other value (including unset or unrecognized strings) maps to `M`.
pub fn gender_code(gender: &str) -> char {
    if gender == "Female" {
        'F'
    } else {
        'M'
    }
}

/// Concatenate territory, age, and gender codes into the campaign code. No
/// further validation is applied to the result.
pub fn compose(territory_code: &str, age: u8, gender: &str) -> String {
    format!("{}{}{}", territory_code, age_code(age), gender_code(gender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_bucket_boundaries_are_exact() {
        assert_eq!(age_code(18), '1');
        assert_eq!(age_code(34), '1');
        assert_eq!(age_code(35), '2');
        assert_eq!(age_code(44), '2');
        assert_eq!(age_code(45), '3');
        assert_eq!(age_code(90), '3');
    }

    #[test]
    fn only_exact_female_literal_maps_to_f() {
        assert_eq!(gender_code("Female"), 'F');
        assert_eq!(gender_code("female"), 'M');
        assert_eq!(gender_code("Male"), 'M');
        assert_eq!(gender_code("Other"), 'M');
        assert_eq!(gender_code(""), 'M');
    }

    #[test]
    fn composed_code_concatenates_all_three_parts() {
        assert_eq!(compose("#NYIG2", 30, "Female"), "#NYIG21F");
        assert_eq!(compose("#BOIG2", 50, "Male"), "#BOIG23M");
    }
}
