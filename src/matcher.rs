use crate::model::ProjectType;

/// Determine which recognized project-file kinds appear among the given
/// directory entry names. Matching is by file extension, case-insensitive;
/// the result is in canonical order and empty when the directory is not a
/// project directory.
pub fn match_types<I, S>(names: I) -> Vec<ProjectType>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut found = [false; ProjectType::ALL.len()];
    for name in names {
        let lower = name.as_ref().to_lowercase();
        for (i, ty) in ProjectType::ALL.iter().enumerate() {
            // A dotfile named exactly like the extension has no stem and is
            // not a project file.
            if lower.ends_with(ty.ext()) && lower.len() > ty.ext().len() {
                found[i] = true;
            }
        }
    }
    ProjectType::ALL
        .iter()
        .copied()
        .zip(found)
        .filter_map(|(ty, hit)| hit.then_some(ty))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_listing_is_no_project() {
        assert_eq!(match_types(Vec::<String>::new()), vec![]);
        assert_eq!(match_types(["readme.md", "lib.rs"]), vec![]);
    }

    #[test]
    fn matches_are_case_insensitive() {
        assert_eq!(
            match_types(["App.CSPROJ", "notes.txt"]),
            vec![ProjectType::Csproj]
        );
    }

    #[test]
    fn result_is_in_canonical_order() {
        // Input order must not leak into the output.
        assert_eq!(
            match_types(["z.sln", "a.vcxproj", "m.bproj"]),
            vec![ProjectType::Bproj, ProjectType::Vcxproj, ProjectType::Sln]
        );
    }

    #[test]
    fn bare_extension_name_does_not_match_prefix() {
        // "foo.csproj.bak" should not count as a .csproj file.
        assert_eq!(match_types(["foo.csproj.bak"]), vec![]);
        // A dotfile with no stem is not a project file either.
        assert_eq!(match_types([".csproj"]), vec![]);
    }
}
