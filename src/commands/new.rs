//! Create a new post

use anyhow::Result;
use std::fs;

use crate::Blog;

/// Create a new markdown post with a front-matter scaffold
pub fn run(blog: &Blog, title: &str) -> Result<()> {
    let now = chrono::Local::now();

    fs::create_dir_all(&blog.posts_dir)?;

    let filename = format!("{}.md", slug::slugify(title));
    let file_path = blog.posts_dir.join(&filename);

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        r#"---
title: {}
date: {}
description: ""
tags: {}
---

"#,
        title,
        now.format(&blog.config.date_format),
        blog.config.default_tags.join(", ")
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_post_created_with_scaffold() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        run(&blog, "Choosing a Montessori School").unwrap();

        let path = blog.posts_dir.join("choosing-a-montessori-school.md");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("---\ntitle: Choosing a Montessori School\n"));
        assert!(content.contains("tags: Education, Montessori, School Choice"));
    }

    #[test]
    fn test_new_post_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        run(&blog, "Duplicate").unwrap();
        assert!(run(&blog, "Duplicate").is_err());
    }
}
