//! Build plan emission.
//!
//! Task order: plugin application, compiler and SDK configuration,
//! dependency resolution, then the compile phases that have inputs.
//! `Assemble` is always the last task.

use std::collections::HashMap;

use droidplan_core::dependency::Scope;
use droidplan_resolver::conflict::OverrideReport;
use droidplan_resolver::graph::DependencyGraph;
use droidplan_resolver::plugin_graph::PluginGraph;
use droidplan_resolver::resolver::VersionSource;
use droidplan_util::errors::DroidplanError;

use crate::task::{ResolvedBuildPlan, Task, TaskKind};
use crate::validate::ValidatedModule;

#[derive(Default)]
struct PlanBuilder {
    tasks: Vec<Task>,
}

impl PlanBuilder {
    /// Append a task and return its id.
    fn push(
        &mut self,
        name: impl Into<String>,
        kind: TaskKind,
        mut depends_on: Vec<usize>,
        dependencies: Vec<String>,
    ) -> usize {
        let id = self.tasks.len();
        depends_on.sort_unstable();
        depends_on.dedup();
        debug_assert!(depends_on.iter().all(|&d| d < id));
        self.tasks.push(Task {
            id,
            name: name.into(),
            kind,
            depends_on,
            dependencies,
        });
        id
    }
}

pub fn emit(
    module: &ValidatedModule,
    plugins: &PluginGraph,
    graph: &DependencyGraph,
    overrides: &OverrideReport,
) -> Result<ResolvedBuildPlan, DroidplanError> {
    let mut plan = PlanBuilder::default();

    let mut last_plugin: Option<usize> = None;
    for plugin in plugins.order()? {
        let id = plan.push(
            format!("applyPlugin:{}", plugin.id),
            TaskKind::ApplyPlugin {
                plugin: plugin.id.clone(),
                version: plugin.version.clone(),
            },
            last_plugin.into_iter().collect(),
            Vec::new(),
        );
        last_plugin = Some(id);
    }

    let compiler = plan.push(
        "configureCompiler",
        TaskKind::ConfigureCompiler {
            source: module.language,
            target: module.language,
            jvm_target: module.language,
            desugaring: module.desugaring,
        },
        last_plugin.into_iter().collect(),
        Vec::new(),
    );
    let sdk = plan.push(
        "configureSdk",
        TaskKind::ConfigureSdk {
            compile: module.sdk.compile,
            target: module.sdk.target,
            min: module.sdk.min,
            ndk_version: module.ndk_version.clone(),
        },
        last_plugin.into_iter().collect(),
        Vec::new(),
    );

    let ordered = graph.topological_order()?;
    let mut resolve_task: HashMap<String, usize> = HashMap::new();
    for node in &ordered {
        let mut depends_on = vec![sdk];
        if let Some(idx) = graph.find(&node.key()) {
            for req in graph.requirements_of(idx) {
                if let Some(&task) = resolve_task.get(&graph.node(req).key()) {
                    depends_on.push(task);
                }
            }
        }
        let platform = match &node.source {
            VersionSource::Explicit => None,
            VersionSource::Platform(bom) => Some(bom.to_string()),
        };
        let id = plan.push(
            format!("resolve:{}", node.key()),
            TaskKind::ResolveDependency {
                coordinate: node.coordinate.to_string(),
                scope: node.primary_scope(),
                platform,
            },
            depends_on,
            vec![node.coordinate.to_string()],
        );
        resolve_task.insert(node.key(), id);
    }

    // Resolve tasks and coordinates of every node in any of `scopes`.
    let inputs = |scopes: &[Scope]| -> (Vec<usize>, Vec<String>) {
        ordered
            .iter()
            .filter(|n| n.scopes.iter().any(|s| scopes.contains(s)))
            .filter_map(|n| {
                resolve_task
                    .get(&n.key())
                    .map(|&task| (task, n.coordinate.to_string()))
            })
            .unzip()
    };

    let (processor_tasks, processor_deps) = inputs(&[Scope::AnnotationProcessor]);
    let processors = (!processor_deps.is_empty()).then(|| {
        let mut depends_on = processor_tasks;
        depends_on.push(compiler);
        plan.push("processAnnotations", TaskKind::ProcessAnnotations, depends_on, processor_deps)
    });

    let (main_tasks, main_deps) = inputs(&[Scope::Compile, Scope::Desugaring]);
    let main = (!main_deps.is_empty()).then(|| {
        let mut depends_on = main_tasks;
        depends_on.extend([compiler, sdk]);
        depends_on.extend(processors);
        plan.push("compileMain", TaskKind::CompileMain, depends_on, main_deps)
    });

    let (test_tasks, test_deps) = inputs(&[Scope::TestOnly]);
    if !test_deps.is_empty() {
        let mut depends_on = test_tasks;
        depends_on.push(compiler);
        depends_on.extend(main);
        plan.push("compileTests", TaskKind::CompileTests, depends_on, test_deps);
    }

    let (runtime_tasks, runtime_deps) = inputs(&[Scope::Compile, Scope::Runtime]);
    let mut depends_on = runtime_tasks;
    depends_on.extend([compiler, sdk]);
    depends_on.extend(main);
    plan.push("assemble", TaskKind::Assemble, depends_on, runtime_deps);

    tracing::debug!(tasks = plan.tasks.len(), "emitted build plan");
    Ok(ResolvedBuildPlan::new(module, plan.tasks, overrides.clone()))
}
