use crate::resources::{Circular, GenerationReport, Promotion, Resource, RulesManual, Training, Transfer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NavGroup {
    pub title: &'static str,
    pub links: &'static [NavLink],
}

const fn link<R: Resource>() -> NavLink {
    NavLink {
        label: R::TITLE,
        href: R::ROUTE,
    }
}

pub(crate) const NAV_GROUPS: &[NavGroup] = &[
    NavGroup {
        title: "Portal",
        links: &[NavLink {
            label: "Home",
            href: "/",
        }],
    },
    NavGroup {
        title: "Documents",
        links: &[link::<Circular>(), link::<RulesManual>()],
    },
    NavGroup {
        title: "Human Resources",
        links: &[link::<Promotion>(), link::<Transfer>(), link::<Training>()],
    },
    NavGroup {
        title: "Reports",
        links: &[link::<GenerationReport>()],
    },
    NavGroup {
        title: "Account",
        links: &[NavLink {
            label: "Change password",
            href: "/change-password",
        }],
    },
];

pub(crate) fn is_active(href: &str, path: &str) -> bool {
    let path = path.trim_end_matches('/');
    if href == "/" {
        return path.is_empty();
    }
    path == href || path.starts_with(&format!("{href}/"))
}

pub(crate) fn active_group(path: &str) -> Option<&'static NavGroup> {
    NAV_GROUPS
        .iter()
        .find(|g| g.links.iter().any(|l| is_active(l.href, path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_resource_route_is_linked() {
        let hrefs: Vec<&str> = NAV_GROUPS
            .iter()
            .flat_map(|g| g.links.iter().map(|l| l.href))
            .collect();
        for route in [
            Circular::ROUTE,
            Promotion::ROUTE,
            Transfer::ROUTE,
            Training::ROUTE,
            RulesManual::ROUTE,
            GenerationReport::ROUTE,
        ] {
            assert!(hrefs.contains(&route), "{route} missing from sidebar");
        }
    }

    #[test]
    fn test_is_active() {
        assert!(is_active("/", "/"));
        assert!(is_active("/", ""));
        assert!(!is_active("/", "/circulars"));
        assert!(is_active("/circulars", "/circulars/"));
        assert!(is_active("/circulars", "/circulars/12"));
        assert!(!is_active("/circulars", "/circulars-archive"));
    }

    #[test]
    fn test_active_group() {
        assert_eq!(active_group("/transfers").map(|g| g.title), Some("Human Resources"));
        assert_eq!(active_group("/nowhere"), None);
    }
}
