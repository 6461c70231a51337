//! Tree walker
//!
//! Walks a template tree, cascading options from directory to directory,
//! rendering each file and merging it into the destination tree. Siblings are
//! processed concurrently.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::{debug, info};

use crate::error::{GenerationError, GenerationResult};
use crate::merge::MergePipeline;
use crate::models::{FileAction, FileOutcome, GenerationContext, GenerationReport};
use crate::options::{self, GenerationOptions};
use crate::output_writer::{OutputWriter, OutputWriterConfig};
use crate::templates::{RenderEnvironment, RenderPipeline};

/// Kind of a template tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// A node of the template tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNode {
    /// File or directory name
    pub name: String,
    /// Node kind
    pub kind: NodeKind,
    /// Source path
    pub path: PathBuf,
    /// Children sorted by name (directories only)
    pub children: Vec<TemplateNode>,
}

impl TemplateNode {
    /// Scan the tree rooted at `path`
    pub fn scan(path: PathBuf) -> BoxFuture<'static, GenerationResult<TemplateNode>> {
        async move {
            let metadata = tokio::fs::metadata(&path).await?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if !metadata.is_dir() {
                return Ok(TemplateNode {
                    name,
                    kind: NodeKind::File,
                    path,
                    children: Vec::new(),
                });
            }

            let mut entries = tokio::fs::read_dir(&path).await?;
            let mut child_paths = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                child_paths.push(entry.path());
            }
            child_paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

            let mut children = Vec::with_capacity(child_paths.len());
            for child in child_paths {
                children.push(TemplateNode::scan(child).await?);
            }

            Ok(TemplateNode {
                name,
                kind: NodeKind::Directory,
                path,
                children,
            })
        }
        .boxed()
    }

    /// Number of files in this subtree
    pub fn file_count(&self) -> usize {
        match self.kind {
            NodeKind::File => 1,
            NodeKind::Directory => self.children.iter().map(TemplateNode::file_count).sum(),
        }
    }
}

/// State shared by every node of one walk
struct Walk {
    env: Arc<RenderEnvironment>,
    writer: OutputWriter,
    root: PathBuf,
    ignored_folders: Vec<String>,
    ignored_files: Vec<String>,
}

impl Walk {
    fn render_name(&self, template: &str, context: &GenerationContext) -> GenerationResult<String> {
        let data = context.to_render_data()?;
        Ok(self.env.render(template, &data)?.trim().to_string())
    }
}

/// Generates a template tree into a target directory
#[derive(Debug, Clone)]
pub struct Generator {
    env: Arc<RenderEnvironment>,
    writer: OutputWriter,
}

impl Generator {
    /// Create a generator using `env` for every render
    pub fn new(env: Arc<RenderEnvironment>) -> Self {
        Self {
            env,
            writer: OutputWriter::new(),
        }
    }

    /// Create a generator with the helper scripts of the template at `template_root`
    pub fn for_template(template_root: &Path, options: &GenerationOptions) -> GenerationResult<Self> {
        let helpers = template_root.join(&options.helpers_folder_name);
        let env = RenderEnvironment::with_helpers_folder(&helpers)?;
        Ok(Self::new(Arc::new(env)))
    }

    /// Preview without writing
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.writer = OutputWriter::with_config(OutputWriterConfig { dry_run });
        self
    }

    /// The render environment shared by the walk
    pub fn environment(&self) -> &Arc<RenderEnvironment> {
        &self.env
    }

    /// Generate the tree at `root.origin_path` into `root.target_path`
    ///
    /// Every sibling runs to completion; the first error encountered is
    /// returned once they all have.
    pub async fn generate(&self, root: &GenerationContext) -> GenerationResult<GenerationReport> {
        let walk_root = root.origin_path.clone();
        if !tokio::fs::try_exists(&walk_root).await? {
            return Err(GenerationError::TemplateNotFound(walk_root));
        }

        info!(
            origin = %walk_root.display(),
            target = %root.target_path.display(),
            dry_run = self.writer.is_dry_run(),
            "Generating"
        );

        let tree = TemplateNode::scan(walk_root.clone()).await?;
        let root_options = match tree.kind {
            NodeKind::Directory => options::cascade_for_directory(&root.options, &walk_root)
                .await
                .map_err(|e| e.at(&walk_root))?,
            NodeKind::File => (*root.options).clone(),
        };

        let walk = Arc::new(Walk {
            env: Arc::clone(&self.env),
            writer: self.writer.clone(),
            root: walk_root,
            ignored_folders: root_options
                .reserved_folders()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ignored_files: vec![root_options.descriptor_file_name.clone()],
        });
        let context = root.with_options(root_options);

        let files = match tree.kind {
            NodeKind::File => process_file(walk, context, tree).await?,
            NodeKind::Directory => walk_children(walk, context, tree.children).await?,
        };

        let report = GenerationReport {
            files,
            dry_run: self.writer.is_dry_run(),
        };
        info!(
            written = report.count(FileAction::Written),
            copied = report.count(FileAction::Copied),
            skipped = report.count(FileAction::Skipped),
            "Generation complete"
        );
        Ok(report)
    }
}

fn walk_children(
    walk: Arc<Walk>,
    context: GenerationContext,
    children: Vec<TemplateNode>,
) -> BoxFuture<'static, GenerationResult<Vec<FileOutcome>>> {
    async move {
        let tasks = children
            .into_iter()
            .map(|child| process_node(Arc::clone(&walk), context.clone(), child));
        let results = join_all(tasks).await;

        let mut files = Vec::new();
        let mut first_error = None;
        for result in results {
            match result {
                Ok(outcomes) => files.extend(outcomes),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => debug!("Additional sibling failure: {}", e),
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(files),
        }
    }
    .boxed()
}

fn process_node(
    walk: Arc<Walk>,
    parent: GenerationContext,
    node: TemplateNode,
) -> BoxFuture<'static, GenerationResult<Vec<FileOutcome>>> {
    async move {
        let path = node.path.clone();
        let result = match node.kind {
            NodeKind::Directory => process_directory(walk, parent, node).await,
            NodeKind::File => process_file(walk, parent, node).await,
        };
        result.map_err(|e| e.at(path))
    }
    .boxed()
}

async fn process_directory(
    walk: Arc<Walk>,
    parent: GenerationContext,
    node: TemplateNode,
) -> GenerationResult<Vec<FileOutcome>> {
    if walk.ignored_folders.iter().any(|f| f == &node.name) {
        debug!(path = %node.path.display(), "Skipping reserved folder");
        return Ok(Vec::new());
    }

    let target_name = walk.render_name(&node.name, &parent)?;
    if target_name.is_empty() {
        debug!(path = %node.path.display(), "Directory name rendered empty, skipping");
        return Ok(Vec::new());
    }

    let options = options::cascade_for_directory(&parent.options, &node.path).await?;
    if options.ignores(&walk.root, &node.path, true) {
        debug!(path = %node.path.display(), "Directory ignored");
        return Ok(Vec::new());
    }

    let target = parent.target_path.join(target_name);
    let context = parent.with_options(options).at_node(&node.path, &target);
    walk_children(walk, context, node.children).await
}

async fn process_file(
    walk: Arc<Walk>,
    parent: GenerationContext,
    node: TemplateNode,
) -> GenerationResult<Vec<FileOutcome>> {
    if walk.ignored_files.iter().any(|f| f == &node.name) {
        return Ok(Vec::new());
    }

    let skipped = |target: Option<PathBuf>| {
        vec![FileOutcome {
            origin: node.path.clone(),
            target,
            action: FileAction::Skipped,
        }]
    };

    let bytes = tokio::fs::read(&node.path).await?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            if parent.options.ignores(&walk.root, &node.path, false) {
                return Ok(skipped(None));
            }
            let target_name = walk.render_name(&node.name, &parent)?;
            if target_name.is_empty() {
                return Ok(skipped(None));
            }
            let target = parent.target_path.join(target_name);
            debug!(path = %node.path.display(), "Copying non-text file");
            let action = walk.writer.copy_bytes(&target, e.as_bytes()).await?;
            return Ok(vec![FileOutcome {
                origin: node.path,
                target: Some(target),
                action,
            }]);
        }
    };

    let directives = options::extract_from_file_content(&parent.options, &text)?;
    if directives.options.ignores(&walk.root, &node.path, false) {
        debug!(path = %node.path.display(), "File ignored");
        return Ok(skipped(None));
    }

    let context = parent.with_options(directives.options);
    let name_template = context
        .options
        .target_name
        .clone()
        .unwrap_or_else(|| node.name.clone());
    let target_name = walk.render_name(&name_template, &context)?;
    if target_name.is_empty() {
        debug!(path = %node.path.display(), "Target name rendered empty, skipping");
        return Ok(skipped(None));
    }

    let target = parent.target_path.join(&target_name);
    let context = context.at_node(&node.path, &target);

    let rendered = RenderPipeline::from_kinds(&context.options.renderers, &walk.env)
        .run(context.clone(), &directives.content)?;
    let existing = walk.writer.read_existing(&target).await?;
    let merged = MergePipeline::from_kinds(&context.options.mergers, &walk.env)
        .run(&context, &rendered, &existing)?;
    let output = options::strip_directives(&context.options, &merged)?;

    let action = walk.writer.write_text(&target, &output).await?;
    debug!(origin = %node.path.display(), target = %target.display(), "Generated file");

    Ok(vec![FileOutcome {
        origin: node.path,
        target: Some(target),
        action,
    }])
}
