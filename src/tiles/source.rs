use crate::core::geo::TileCoord;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Tile source driven by a Leaflet-style URL template with `{s}`, `{z}`,
/// `{x}` and `{y}` placeholders.
pub struct TemplateSource {
    template: String,
    subdomains: Vec<String>,
}

impl TemplateSource {
    pub fn new(template: impl Into<String>, subdomains: Vec<String>) -> Self {
        Self {
            template: template.into(),
            subdomains,
        }
    }
}

impl TileSource for TemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        let sub = if self.subdomains.is_empty() {
            ""
        } else {
            let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
            self.subdomains[idx].as_str()
        };

        self.template
            .replace("{s}", sub)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_substitution() {
        let source = TemplateSource::new(
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            vec!["a".into(), "b".into(), "c".into()],
        );
        let url = source.url(TileCoord::new(4, 6, 5));
        // (4 + 6) % 3 == 1 -> subdomain "b"
        assert_eq!(url, "https://b.tile.openstreetmap.org/5/4/6.png");
    }

    #[test]
    fn test_no_subdomains() {
        let source = TemplateSource::new("https://tiles.example.com/{z}/{x}/{y}.png", Vec::new());
        assert_eq!(
            source.url(TileCoord::new(1, 2, 3)),
            "https://tiles.example.com/3/1/2.png"
        );
    }
}
