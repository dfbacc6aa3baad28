use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use winops_protocol::RepositoryItem;

/// A node that owns its children.
pub trait TreeNode: Sized + Send + Sync {
    fn children_mut(&mut self) -> &mut Vec<Self>;
}

impl TreeNode for RepositoryItem {
    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}

/// Lists the direct children of a node.
#[async_trait]
pub trait ChildSource<N: TreeNode>: Send + Sync {
    type Error: Send;

    async fn children(&self, parent: &N) -> Result<Vec<N>, Self::Error>;
}

type ExpandFuture<'a, E> = Pin<Box<dyn Future<Output = Result<(), E>> + Send + 'a>>;

/// Replaces `node`'s children with what `source` lists for it and, when
/// `recursive`, descends into each child in order, depth first.
///
/// Queries run one at a time. The first failing query aborts the whole
/// expansion and its error is returned; nodes expanded before it keep
/// their children.
pub async fn expand<N, S>(source: &S, node: &mut N, recursive: bool) -> Result<(), S::Error>
where
    N: TreeNode,
    S: ChildSource<N> + ?Sized,
{
    expand_at(source, node, recursive, 0).await
}

/// Children of `parent`, expanded as [`expand`] does.
pub async fn children_of<N, S>(source: &S, mut parent: N, recursive: bool) -> Result<Vec<N>, S::Error>
where
    N: TreeNode,
    S: ChildSource<N> + ?Sized,
{
    expand(source, &mut parent, recursive).await?;
    Ok(std::mem::take(parent.children_mut()))
}

fn expand_at<'a, N, S>(
    source: &'a S,
    node: &'a mut N,
    recursive: bool,
    depth: usize,
) -> ExpandFuture<'a, S::Error>
where
    N: TreeNode,
    S: ChildSource<N> + ?Sized,
{
    Box::pin(async move {
        let children = source.children(node).await?;
        log::debug!("depth {depth}: {} children", children.len());
        *node.children_mut() = children;
        if recursive {
            for child in node.children_mut().iter_mut() {
                expand_at(source, child, recursive, depth + 1).await?;
            }
        }
        Ok(())
    })
}
