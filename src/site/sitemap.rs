use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::{backend::PostRecord, config::Site, content::attr};

struct Entry<'a> {
    loc: String,
    lastmod: NaiveDate,
    changefreq: &'a str,
    priority: &'a str,
}

fn write_entry(out: &mut String, entry: &Entry<'_>) {
    write!(
        out,
        "
    <url>
        <loc>{}</loc>
        <lastmod>{}</lastmod>
        <changefreq>{}</changefreq>
        <priority>{}</priority>
    </url>",
        attr(&entry.loc),
        entry.lastmod.format("%Y-%m-%d"),
        entry.changefreq,
        entry.priority,
    )
    .unwrap();
}

/// `sitemap.xml` listing the home and about pages plus every post.
pub fn render_sitemap(site: &Site, posts: &[PostRecord], today: NaiveDate) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    let pages = [
        Entry {
            loc: format!("{}/", site.base_url),
            lastmod: today,
            changefreq: "weekly",
            priority: "1.0",
        },
        Entry {
            loc: format!("{}/about.html", site.base_url),
            lastmod: today,
            changefreq: "monthly",
            priority: "0.8",
        },
    ];
    for entry in &pages {
        write_entry(&mut out, entry);
    }
    for post in posts {
        write_entry(
            &mut out,
            &Entry {
                loc: format!("{}/posts/post-{}.html", site.base_url, post.slug),
                lastmod: post.created_at.date_naive(),
                changefreq: "monthly",
                priority: "0.6",
            },
        );
    }
    out.push_str("\n</urlset>");
    out
}
