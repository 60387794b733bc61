/// Full bootstrap script with every `\ir` include inlined.
pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_users.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_users.sql")),
				"tables/002_tags.sql" => out.push_str(include_str!("../../../sql/tables/002_tags.sql")),
				"tables/003_articles.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_articles.sql")),
				"tables/004_article_tags.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_article_tags.sql")),
				"tables/005_user_tags.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_user_tags.sql")),
				"tables/006_likes.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_likes.sql")),
				"tables/007_comments.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_comments.sql")),
				"tables/008_bookmarks.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_bookmarks.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
