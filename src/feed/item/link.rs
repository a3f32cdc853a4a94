//! Item links.
//!
//! | `linkto`  | page                          | media manager                                   |
//! |-----------|-------------------------------|-------------------------------------------------|
//! | `page`    | `id, rev`                     | `image, ns, rev`                                |
//! | `rev`     | `id, do=revisions, rev`       | `image, ns, rev, tab_details=history`           |
//! | `current` | `id`                          | `image, ns`                                     |
//! | `diff`    | `id, rev, do=diff`            | `image, ns, rev, tab_details=history, mediado=diff` |
//!
//! `rev` is omitted when the item has no date.

use crate::config::LinkTo;
use crate::core::id::namespace_of;
use crate::wiki::ChangeRecord;
use crate::wiki::urls::Urls;

pub fn build(urls: &Urls, link_to: LinkTo, record: &ChangeRecord, date: Option<i64>) -> String {
    let rev = date.map(|d| ("rev", d.to_string()));

    if record.is_media {
        let mut params = vec![
            ("image", record.id.clone()),
            ("ns", namespace_of(&record.id).to_string()),
        ];
        match link_to {
            LinkTo::Current => {}
            LinkTo::Page => params.extend(rev),
            LinkTo::Rev => {
                params.extend(rev);
                params.push(("tab_details", "history".into()));
            }
            LinkTo::Diff => {
                params.extend(rev);
                params.push(("tab_details", "history".into()));
                params.push(("mediado", "diff".into()));
            }
        }
        urls.media_manager(&params)
    } else {
        let mut params = Vec::new();
        match link_to {
            LinkTo::Current => {}
            LinkTo::Page => params.extend(rev),
            LinkTo::Rev => {
                params.push(("do", "revisions".into()));
                params.extend(rev);
            }
            LinkTo::Diff => {
                params.extend(rev);
                params.push(("do", "diff".into()));
            }
        }
        urls.page(&record.id, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> Urls {
        Urls::new("https://wiki.example.com/")
    }

    fn media() -> ChangeRecord {
        ChangeRecord {
            is_media: true,
            ..ChangeRecord::page("photos:cat.png")
        }
    }

    #[test]
    fn test_page_links() {
        let page = ChangeRecord::page("ns:start");
        let base = "https://wiki.example.com/doku.php?id=ns:start";
        assert_eq!(build(&urls(), LinkTo::Page, &page, Some(5)), format!("{base}&rev=5"));
        assert_eq!(
            build(&urls(), LinkTo::Rev, &page, Some(5)),
            format!("{base}&do=revisions&rev=5")
        );
        assert_eq!(build(&urls(), LinkTo::Current, &page, Some(5)), base);
        assert_eq!(
            build(&urls(), LinkTo::Diff, &page, Some(5)),
            format!("{base}&rev=5&do=diff")
        );
    }

    #[test]
    fn test_media_links() {
        let base = "https://wiki.example.com/doku.php?do=media&image=photos:cat.png&ns=photos";
        assert_eq!(build(&urls(), LinkTo::Current, &media(), Some(9)), base);
        assert_eq!(build(&urls(), LinkTo::Page, &media(), Some(9)), format!("{base}&rev=9"));
        assert_eq!(
            build(&urls(), LinkTo::Rev, &media(), Some(9)),
            format!("{base}&rev=9&tab_details=history")
        );
        assert_eq!(
            build(&urls(), LinkTo::Diff, &media(), Some(9)),
            format!("{base}&rev=9&tab_details=history&mediado=diff")
        );
    }

    #[test]
    fn test_no_date_omits_rev() {
        let page = ChangeRecord::page("p");
        assert_eq!(
            build(&urls(), LinkTo::Diff, &page, None),
            "https://wiki.example.com/doku.php?id=p&do=diff"
        );
    }
}
