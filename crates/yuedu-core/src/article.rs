pub const DEFAULT_TITLE: &str = "Article";
pub const DEFAULT_AUTHOR: &str = "Author";
pub const EMPTY_BODY: &str = "Article content not found or empty.";

/// An annotated article as displayed: title line, author line, body lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub author: String,
    pub body: Vec<String>,
}

impl Article {
    /// The first non-empty line is the title, the one after it the author,
    /// everything after that is body.
    pub fn parse(content: &str) -> Self {
        let lines: Vec<&str> = content.split('\n').collect();

        match lines.iter().position(|line| !line.trim().is_empty()) {
            Some(first) => Self {
                title: lines[first].to_string(),
                author: lines.get(first + 1).copied().unwrap_or_default().to_string(),
                body: lines
                    .iter()
                    .skip(first + 2)
                    .map(|line| line.to_string())
                    .collect(),
            },
            None => Self {
                title: DEFAULT_TITLE.to_string(),
                author: DEFAULT_AUTHOR.to_string(),
                body: vec![EMPTY_BODY.to_string()],
            },
        }
    }

    /// Every displayed line paired with its base key
    pub fn keyed_lines(&self) -> Vec<(String, &str)> {
        let mut lines = vec![
            ("title-line".to_string(), self.title.as_str()),
            ("author-line".to_string(), self.author.as_str()),
        ];
        lines.extend(
            self.body
                .iter()
                .enumerate()
                .map(|(index, line)| (format!("line-{index}"), line.as_str())),
        );
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_title_author_and_body() {
        let article = Article::parse("\n\n<论语>\n孔子\n第一段\n\n第二段");

        assert_eq!(article.title, "<论语>");
        assert_eq!(article.author, "孔子");
        assert_eq!(article.body, vec!["第一段", "", "第二段"]);
    }

    #[test]
    fn missing_author_is_empty() {
        let article = Article::parse("只有标题");

        assert_eq!(article.title, "只有标题");
        assert_eq!(article.author, "");
        assert!(article.body.is_empty());
    }

    #[test]
    fn blank_content_uses_placeholders() {
        let article = Article::parse("  \n \n");

        assert_eq!(article.title, DEFAULT_TITLE);
        assert_eq!(article.author, DEFAULT_AUTHOR);
        assert_eq!(article.body, vec![EMPTY_BODY]);
    }

    #[test]
    fn keyed_lines_use_stable_base_keys() {
        let article = Article::parse("题\n作者\n甲\n乙");
        let keys: Vec<String> = article.keyed_lines().into_iter().map(|(k, _)| k).collect();

        assert_eq!(keys, vec!["title-line", "author-line", "line-0", "line-1"]);
    }
}
