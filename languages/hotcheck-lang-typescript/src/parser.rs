//! Import extraction using the SWC AST
use hotcheck_api::{HotcheckError, HotcheckResult, ImportRecord, ModuleSpecifier};
use std::path::Path;
use swc_common::errors::SourceMapper;
use swc_common::{sync::Lrc, FileName, FilePathMapping, SourceMap, Span, Spanned};
use swc_ecma_ast::{
    CallExpr, Callee, EsVersion, ExportAll, Expr, ImportDecl, Lit, NamedExport, Str, Tpl,
};
use swc_ecma_parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};
use tracing::{debug, trace};

/// Pick the parser dialect from the file extension.
///
/// Unknown extensions and anonymous sources are parsed as TypeScript, the
/// most permissive syntax.
pub fn syntax_for_path(path: Option<&Path>) -> Syntax {
    let ext = path.and_then(|p| p.extension()).and_then(|ext| ext.to_str());
    match ext {
        Some("js") | Some("mjs") | Some("cjs") | Some("jsx") => Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
        Some("tsx") => Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Typescript(TsSyntax {
            decorators: true,
            ..Default::default()
        }),
    }
}

/// Parse a JavaScript/TypeScript module and collect its static and dynamic imports
pub fn parse_imports(source: &str, path: Option<&Path>) -> HotcheckResult<Vec<ImportRecord>> {
    let cm: Lrc<SourceMap> = Lrc::new(SourceMap::new(FilePathMapping::empty()));
    let file_name = match path {
        Some(path) => Lrc::new(FileName::Real(path.to_path_buf())),
        None => Lrc::new(FileName::Anon),
    };
    let source_file = cm.new_source_file(file_name, source.to_string());

    let lexer = Lexer::new(
        syntax_for_path(path),
        EsVersion::latest(),
        StringInput::from(&*source_file),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser.parse_module().map_err(|e| {
        let line = cm.lookup_char_pos(e.span().lo).line;
        let label = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<anonymous>".to_string());
        HotcheckError::parse(format!("{}:{}: {}", label, line, e.kind().msg()))
    })?;

    let recovered = parser.take_errors();
    if !recovered.is_empty() {
        debug!(
            recovered_errors = recovered.len(),
            "SWC recovered from syntax errors while extracting imports"
        );
    }

    let mut visitor = ImportVisitor::new(cm);
    module.visit_with(&mut visitor);
    Ok(visitor.imports)
}

/// Visitor that extracts import records from the SWC AST
struct ImportVisitor {
    cm: Lrc<SourceMap>,
    imports: Vec<ImportRecord>,
}

impl ImportVisitor {
    fn new(cm: Lrc<SourceMap>) -> Self {
        Self {
            cm,
            imports: Vec::new(),
        }
    }

    fn line(&self, span: Span) -> usize {
        self.cm.lookup_char_pos(span.lo).line
    }

    fn snippet(&self, span: Span) -> String {
        self.cm.span_to_snippet(span).unwrap_or_default()
    }

    fn literal(&self, src: &Str) -> ModuleSpecifier {
        ModuleSpecifier::literal(self.snippet(src.span), src.value.to_string())
    }

    /// Evaluate the argument of `import(...)` when it is statically known
    fn dynamic_specifier(&self, expr: &Expr) -> ModuleSpecifier {
        match expr {
            Expr::Lit(Lit::Str(s)) => self.literal(s),
            Expr::Tpl(Tpl { exprs, quasis, span, .. }) if exprs.is_empty() && quasis.len() == 1 => {
                match &quasis[0].cooked {
                    Some(cooked) => ModuleSpecifier::literal(self.snippet(*span), cooked.to_string()),
                    None => ModuleSpecifier::computed(self.snippet(*span)),
                }
            }
            Expr::Paren(paren) => self.dynamic_specifier(&paren.expr),
            other => ModuleSpecifier::computed(self.snippet(other.span())),
        }
    }

    fn push(&mut self, record: ImportRecord) {
        trace!(
            specifier = %record.module_specifier.code,
            dynamic = record.is_dynamic,
            line = record.line,
            "Found import"
        );
        self.imports.push(record);
    }
}

impl Visit for ImportVisitor {
    fn visit_import_decl(&mut self, n: &ImportDecl) {
        let record = ImportRecord::new_static(self.literal(&n.src), self.line(n.span))
            .with_type_only(n.type_only);
        self.push(record);
    }

    fn visit_named_export(&mut self, n: &NamedExport) {
        if let Some(src) = &n.src {
            let record = ImportRecord::new_static(self.literal(src), self.line(n.span))
                .with_type_only(n.type_only);
            self.push(record);
        }
    }

    fn visit_export_all(&mut self, n: &ExportAll) {
        let record = ImportRecord::new_static(self.literal(&n.src), self.line(n.span))
            .with_type_only(n.type_only);
        self.push(record);
    }

    fn visit_call_expr(&mut self, n: &CallExpr) {
        if let Callee::Import(_) = &n.callee {
            if let Some(arg) = n.args.first().filter(|arg| arg.spread.is_none()) {
                let record =
                    ImportRecord::new_dynamic(self.dynamic_specifier(&arg.expr), self.line(n.span));
                self.push(record);
            }
        }
        n.visit_children_with(self);
    }
}
