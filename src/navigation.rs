//! The navigation bar shown at the top of every logged in page.

use maud::{Markup, html};

use crate::{endpoints, tenant::Role};

/// A link in the navigation bar. Only one link should be current at a time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm md:bg-transparent
        md:text-blue-700 md:p-0 dark:text-white md:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        md:hover:bg-transparent md:border-0 md:hover:text-blue-700 md:p-0
        dark:text-white md:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white md:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) aria-current=[self.is_current.then_some("page")] { (self.title) } )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar for a user with `role`.
    ///
    /// The link matching `active_endpoint` is highlighted. The members link is only
    /// shown to roles that can manage members.
    pub fn new(active_endpoint: &str, role: Role) -> NavBar<'_> {
        let mut links = vec![Link {
            url: endpoints::TRANSACTIONS_VIEW,
            title: "Transaksi",
            is_current: active_endpoint == endpoints::TRANSACTIONS_VIEW,
        }];

        if role.can_manage_members() {
            links.push(Link {
                url: endpoints::MEMBERS_VIEW,
                title: "Anggota",
                is_current: active_endpoint == endpoints::MEMBERS_VIEW,
            });
        }

        links.push(Link {
            url: endpoints::LOG_OUT,
            title: "Keluar",
            is_current: false,
        });

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                    {
                        "Pembukuan Mobil"
                    }

                    ul
                        class="font-medium flex flex-row p-0 space-x-8 rtl:space-x-reverse"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use crate::{endpoints, navigation::NavBar, tenant::Role};

    fn link_urls(nav_bar: &NavBar<'_>) -> Vec<String> {
        nav_bar.links.iter().map(|link| link.url.to_owned()).collect()
    }

    #[test]
    fn marks_only_the_active_link() {
        let nav_bar = NavBar::new(endpoints::MEMBERS_VIEW, Role::Admin);

        for link in &nav_bar.links {
            assert_eq!(
                link.is_current,
                link.url == endpoints::MEMBERS_VIEW,
                "unexpected active state for {}",
                link.url
            );
        }
    }

    #[test]
    fn plain_users_do_not_get_members_link() {
        let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW, Role::User);

        assert_eq!(
            link_urls(&nav_bar),
            vec![endpoints::TRANSACTIONS_VIEW, endpoints::LOG_OUT]
        );
    }

    #[test]
    fn admins_get_members_link() {
        let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW, Role::SuperAdmin);

        assert_eq!(
            link_urls(&nav_bar),
            vec![
                endpoints::TRANSACTIONS_VIEW,
                endpoints::MEMBERS_VIEW,
                endpoints::LOG_OUT
            ]
        );
    }
}
