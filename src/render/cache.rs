//! Per-theme template sources, loaded once from `<root>/<theme>/<file>`.

use crate::error::RenderError;
use crate::render::TemplateHelpers;
use minijinja::{AutoEscape, Environment};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::OnceCell;

/// All template files of one theme. Files may include/extend each other.
#[derive(Debug)]
pub struct ThemeTemplates {
    name: String,
    sources: BTreeMap<String, String>,
}

impl ThemeTemplates {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self, template: &str) -> Option<&str> {
        self.sources.get(template).map(String::as_str)
    }

    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Fresh environment over the cached sources with this render's helpers.
    pub fn environment(self: &Arc<Self>, helpers: &TemplateHelpers) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        let sources = Arc::clone(self);
        env.set_loader(move |name| Ok(sources.source(name).map(str::to_owned)));
        helpers.register(&mut env);
        env
    }

    /// Parse every file so syntax errors surface at load time.
    fn check_syntax(&self) -> Result<(), RenderError> {
        let mut env = Environment::new();
        TemplateHelpers::for_theme(self.name.as_str()).register(&mut env);
        for (name, source) in &self.sources {
            env.template_from_named_str(name, source)?;
        }
        Ok(())
    }
}

type ThemeSlot = Arc<OnceCell<Arc<ThemeTemplates>>>;

/// Theme name -> parsed-once template set. Cold themes load on first use, once.
#[derive(Debug)]
pub struct TemplateCache {
    root: PathBuf,
    themes: RwLock<HashMap<String, ThemeSlot>>,
}

impl TemplateCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        TemplateCache {
            root: root.into(),
            themes: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the whole root and cache every theme. Any entry that is not
    /// exactly `<theme>/<file>` fails the walk and leaves the cache untouched.
    pub async fn preload(&self) -> Result<usize, RenderError> {
        let mut loaded = HashMap::new();
        for (path, is_dir) in list_dir(&self.root).await? {
            if !is_dir {
                return Err(RenderError::Layout(path));
            }
            let name = file_name(&path);
            let theme = load_theme(&path, name.clone()).await?;
            tracing::debug!(theme = %name, templates = theme.sources.len(), "theme loaded");
            loaded.insert(name, Arc::new(OnceCell::from(Arc::new(theme))));
        }
        let count = loaded.len();
        *self.themes.write().unwrap_or_else(PoisonError::into_inner) = loaded;
        tracing::info!(root = %self.root.display(), themes = count, "templates preloaded");
        Ok(count)
    }

    /// Cached theme, loading it from disk on first access.
    pub async fn theme(&self, name: &str) -> Result<Arc<ThemeTemplates>, RenderError> {
        let slot = self.slot(name);
        let theme = slot
            .get_or_try_init(|| async {
                let dir = self.root.join(name);
                match tokio::fs::metadata(&dir).await {
                    Ok(meta) if meta.is_dir() => {}
                    _ => return Err(RenderError::ThemeNotFound(name.to_string())),
                }
                let theme = load_theme(&dir, name.to_string()).await?;
                tracing::info!(theme = %name, templates = theme.sources.len(), "theme loaded on demand");
                Ok(Arc::new(theme))
            })
            .await?;
        Ok(Arc::clone(theme))
    }

    /// Drop every cached theme; the next request per theme reloads from disk.
    pub fn invalidate(&self) {
        self.themes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Execute `template` of the helpers' theme against `data`.
    pub async fn render<S: serde::Serialize>(
        &self,
        helpers: &TemplateHelpers,
        template: &str,
        data: S,
    ) -> Result<String, RenderError> {
        let theme = self.theme(helpers.theme()).await?;
        let env = theme.environment(helpers);
        let tmpl = env.get_template(template)?;
        Ok(tmpl.render(data)?)
    }

    fn slot(&self, name: &str) -> ThemeSlot {
        if let Some(slot) = self
            .themes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(slot);
        }
        let mut themes = self.themes.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(themes.entry(name.to_string()).or_default())
    }
}

/// Read one theme directory; every entry must be a file.
async fn load_theme(dir: &Path, name: String) -> Result<ThemeTemplates, RenderError> {
    let mut sources = BTreeMap::new();
    for (path, is_dir) in list_dir(dir).await? {
        if is_dir {
            return Err(RenderError::Layout(path));
        }
        let source = tokio::fs::read_to_string(&path).await.map_err(io_err(&path))?;
        sources.insert(file_name(&path), source);
    }
    let theme = ThemeTemplates { name, sources };
    theme.check_syntax()?;
    Ok(theme)
}

/// Entries of `dir` as (path, is_dir), following symlinks, skipping dotfiles.
async fn list_dir(dir: &Path) -> Result<Vec<(PathBuf, bool)>, RenderError> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err(dir))?;
    let mut out = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err(dir))? {
        let path = entry.path();
        if file_name(&path).starts_with('.') {
            continue;
        }
        let meta = tokio::fs::metadata(&path).await.map_err(io_err(&path))?;
        out.push((path, meta.is_dir()));
    }
    out.sort();
    Ok(out)
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> RenderError {
    let path = path.to_path_buf();
    move |source| RenderError::Io { path, source }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
