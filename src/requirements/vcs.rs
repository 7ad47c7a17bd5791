// src/requirements/vcs.rs

//! Git requirement URL parsing
//!
//! Three spellings of the same repository are understood:
//!
//! - `git://host/org/repo@ref#egg=repo`
//! - `git+https://host/org/repo@ref#egg=repo` (also `http`, `ssh`, `git`, `file`)
//! - `git+git@host:org/repo@ref#egg=repo` (scp-like)
//!
//! All of them normalize to the same clone URL (`host/org/repo`), ref and
//! name. Mercurial, Subversion and Bazaar URLs are not parsed; pip receives
//! them as written.

use super::descriptor::VcsRequirement;

/// URL schemes accepted after `git+`
const GIT_SCHEMES: [&str; 5] = ["http", "https", "ssh", "git", "file"];

/// VCS prefixes that are handed to pip without structural parsing
pub const PASSTHROUGH_VCS: [&str; 3] = ["hg+", "svn+", "bzr+"];

/// Parse a whitespace-free git requirement
///
/// Returns `None` when the text is not one of the three git forms.
pub fn parse_git(line: &str) -> Option<VcsRequirement> {
    if !line.starts_with("git") {
        return None;
    }

    let (location, fragment) = match line.split_once('#') {
        Some((location, fragment)) => (location, Some(fragment)),
        None => (line, None),
    };

    let (clone_url, git_ref) = if let Some(body) = location.strip_prefix("git://") {
        split_location(body, false)?
    } else if let Some(body) = scheme_wrapped(location) {
        split_location(body, false)?
    } else if let Some(body) = location.strip_prefix("git+git@") {
        split_location(body, true)?
    } else {
        return None;
    };

    let name = clone_url.rsplit('/').next().unwrap_or_default().to_string();
    if name.is_empty() {
        return None;
    }

    Some(VcsRequirement {
        clone_url,
        git_ref,
        name,
        egg: fragment.and_then(egg_name),
    })
}

/// Strip `git+<scheme>://` for the supported schemes
fn scheme_wrapped(location: &str) -> Option<&str> {
    let rest = location.strip_prefix("git+")?;
    let (scheme, body) = rest.split_once("://")?;
    GIT_SCHEMES.contains(&scheme).then_some(body)
}

/// Split `host/path[@ref]` into a normalized clone URL and ref
fn split_location(body: &str, scp: bool) -> Option<(String, Option<String>)> {
    // user@ in the authority is not a ref separator
    let body = match body.split_once('/') {
        Some((authority, _)) if !scp && authority.contains('@') => {
            let at = authority.rfind('@')?;
            &body[at + 1..]
        }
        _ => body,
    };

    let (url, git_ref) = match body.rsplit_once('@') {
        Some((url, git_ref)) if !git_ref.is_empty() => (url, Some(git_ref.to_string())),
        Some((url, _)) => (url, None),
        None => (body, None),
    };

    let url = url.trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url).trim_end_matches('/');
    if url.is_empty() {
        return None;
    }

    let url = if scp {
        url.replacen(':', "/", 1)
    } else {
        url.to_string()
    };

    Some((url, git_ref))
}

/// Extract the `egg=` value from a URL fragment
fn egg_name(fragment: &str) -> Option<String> {
    fragment
        .split('&')
        .find_map(|part| part.strip_prefix("egg="))
        .filter(|egg| !egg.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(line: &str) -> (String, Option<String>, String) {
        let vcs = parse_git(line).unwrap();
        (vcs.clone_url, vcs.git_ref, vcs.name)
    }

    #[test]
    fn test_bare_git_scheme() {
        assert_eq!(
            parts("git://git.myproject.org/MyProject#egg=MyProject"),
            ("git.myproject.org/MyProject".to_string(), None, "MyProject".to_string())
        );
        assert_eq!(
            parts("git://git.myproject.org/MyProject@1234acbd#egg=MyProject"),
            (
                "git.myproject.org/MyProject".to_string(),
                Some("1234acbd".to_string()),
                "MyProject".to_string()
            )
        );
    }

    #[test]
    fn test_scheme_wrapped() {
        for scheme in GIT_SCHEMES {
            let line = format!("git+{}://git.myproject.org/MyProject.git@v2#egg=MyProject", scheme);
            assert_eq!(
                parts(&line),
                (
                    "git.myproject.org/MyProject".to_string(),
                    Some("v2".to_string()),
                    "MyProject".to_string()
                ),
                "scheme {}",
                scheme
            );
        }
    }

    #[test]
    fn test_unknown_scheme_is_rejected() {
        assert!(parse_git("git+ftp://host/org/repo#egg=repo").is_none());
    }

    #[test]
    fn test_scp_form() {
        assert_eq!(
            parts("git+git@github.com:org/repo.git@1.0.0#egg=repo"),
            ("github.com/org/repo".to_string(), Some("1.0.0".to_string()), "repo".to_string())
        );
    }

    #[test]
    fn test_all_forms_normalize_identically() {
        let expected = parts("git+git@github.com:org/repo@1.0.0#egg=repo");
        assert_eq!(parts("git+https://github.com/org/repo@1.0.0#egg=repo"), expected);
        assert_eq!(parts("git+ssh://github.com/org/repo.git@1.0.0#egg=repo"), expected);
        assert_eq!(parts("git://github.com/org/repo@1.0.0#egg=repo"), expected);
    }

    #[test]
    fn test_userinfo_is_not_a_ref() {
        assert_eq!(
            parts("git+ssh://git@github.com/org/repo#egg=repo"),
            ("github.com/org/repo".to_string(), None, "repo".to_string())
        );
        assert_eq!(
            parts("git+ssh://git@github.com/org/repo@main#egg=repo"),
            ("github.com/org/repo".to_string(), Some("main".to_string()), "repo".to_string())
        );
    }

    #[test]
    fn test_github_host_is_not_mangled() {
        let (url, _, _) = parts("git+https://my.github.io/org/tools.git#egg=tools");
        assert_eq!(url, "my.github.io/org/tools");
    }

    #[test]
    fn test_egg_and_missing_fragment() {
        let vcs = parse_git("git+https://host/org/pkg#subdirectory=src&egg=pkg_egg").unwrap();
        assert_eq!(vcs.egg.as_deref(), Some("pkg_egg"));

        let vcs = parse_git("git+https://host/org/pkg@v1").unwrap();
        assert_eq!(vcs.egg, None);
        assert_eq!(vcs.git_ref.as_deref(), Some("v1"));
    }

    #[test]
    fn test_not_git() {
        assert!(parse_git("https://host/org/pkg#egg=pkg").is_none());
        assert!(parse_git("git+lp:MyProject#egg=MyProject").is_none());
        assert!(parse_git("git://#egg=x").is_none());
    }
}
