//! Compiled-in release names.
//!
//! `(major build, client name, server name)`. Servicing channels that shipped
//! both a client and a server release on one build carry both names.

pub const RELEASES: &[(u32, Option<&str>, Option<&str>)] = &[
    (7601, Some("Windows 7 SP1"), Some("Windows Server 2008 R2 SP1")),
    (9200, Some("Windows 8"), Some("Windows Server 2012")),
    (9600, Some("Windows 8.1"), Some("Windows Server 2012 R2")),
    (10240, Some("Windows 10 1507"), None),
    (10586, Some("Windows 10 1511"), None),
    (14393, Some("Windows 10 1607"), Some("Windows Server 2016")),
    (15063, Some("Windows 10 1703"), None),
    (16299, Some("Windows 10 1709"), Some("Windows Server 1709")),
    (17134, Some("Windows 10 1803"), Some("Windows Server 1803")),
    (17763, Some("Windows 10 1809"), Some("Windows Server 2019")),
    (18362, Some("Windows 10 1903"), Some("Windows Server 1903")),
    (18363, Some("Windows 10 1909"), Some("Windows Server 1909")),
    (19041, Some("Windows 10 2004"), Some("Windows Server 2004")),
    (19042, Some("Windows 10 20H2"), Some("Windows Server 20H2")),
    (19043, Some("Windows 10 21H1"), None),
    (19044, Some("Windows 10 21H2"), None),
    (19045, Some("Windows 10 22H2"), None),
    (20348, None, Some("Windows Server 2022")),
    (22000, Some("Windows 11 21H2"), None),
    (22621, Some("Windows 11 22H2"), None),
    (22631, Some("Windows 11 23H2"), None),
    (25398, None, Some("Windows Server 23H2")),
    (26100, Some("Windows 11 24H2"), Some("Windows Server 2025")),
    (26200, Some("Windows 11 25H2"), None),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_majors_are_unique() {
        let majors: HashSet<u32> = RELEASES.iter().map(|(major, _, _)| *major).collect();
        assert_eq!(majors.len(), RELEASES.len());
    }

    #[test]
    fn test_every_entry_names_something() {
        assert!(RELEASES.iter().all(|(_, c, s)| c.is_some() || s.is_some()));
    }
}
