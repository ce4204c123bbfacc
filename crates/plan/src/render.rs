use minijinja::{context, AutoEscape, Environment};

use crate::error::Result;
use crate::generator::PreparedPlan;
use crate::parameters::Parameters;

const TEMPLATE_NAME: &str = "plan";

/// Render a Jinja-style template with `instant_queries`, `range_queries` and
/// `parameters` in scope.
///
/// Python-style method calls (`range_queries.items()`) work, and nothing is escaped
/// unless the template asks for it with `|e`.
pub fn render_plan(template: &str, plan: &PreparedPlan, parameters: &Parameters) -> Result<String> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_unknown_method_callback(minijinja_contrib::pycompat::unknown_method_callback);
    env.add_template(TEMPLATE_NAME, template)?;

    let rendered = env.get_template(TEMPLATE_NAME)?.render(context! {
        instant_queries => &plan.instant_queries,
        range_queries => &plan.range_queries,
        parameters => parameters
    })?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::generator::{live_now, live_now_minus};
    use dashload_queries::{InstantQuery, RangeQuery, TimeParam};
    use pretty_assertions::assert_eq;

    fn plan() -> PreparedPlan {
        let mut plan = PreparedPlan::default();
        plan.instant_queries.insert(
            "aaaa".to_string(),
            InstantQuery {
                query: "up".to_string(),
                time: Some(live_now()),
            },
        );
        plan.range_queries.insert(
            "bbbb".to_string(),
            RangeQuery {
                query: "rate(x[5m])".to_string(),
                start: Some(live_now_minus(300)),
                end: Some(live_now()),
                step: Some(TimeParam::Int(15)),
            },
        );
        plan
    }

    #[test]
    fn renders_python_style_loops() {
        let template = "{% for name, q in range_queries.items() %}\
            {{ name }}|{{ q.query }}|{{ q.start }}|{{ q.end }}|{{ q.step }}\
            {% endfor %}";
        let rendered = render_plan(template, &plan(), &Parameters::new()).unwrap();
        assert_eq!(
            rendered,
            "bbbb|rate(x[5m])|${__jexl2(${__time(/1000)} - 300)}|${__time(/1000)}|15"
        );
    }

    #[test]
    fn renders_filter_style_loops_and_parameters() {
        let template = "{% for name, q in instant_queries|items %}{{ q.query }}@{{ q.time }}{% endfor %} host={{ parameters.host }}";
        let parameters: Parameters = [("host", "prom:9090")].into_iter().collect();
        let rendered = render_plan(template, &plan(), &parameters).unwrap();
        assert_eq!(rendered, "up@${__time(/1000)} host=prom:9090");
    }

    #[test]
    fn markup_is_not_escaped_by_default() {
        let mut plan = PreparedPlan::default();
        plan.instant_queries.insert(
            "k".to_string(),
            InstantQuery {
                query: "up > 0 and up < 2".to_string(),
                time: Some(TimeParam::Int(1)),
            },
        );
        let template = "{% for key, q in instant_queries|items %}{{ q.query }}|{{ q.query|e }}{% endfor %}";
        let rendered = render_plan(template, &plan, &Parameters::new()).unwrap();
        assert_eq!(rendered, "up > 0 and up < 2|up &gt; 0 and up &lt; 2");
    }

    #[test]
    fn syntax_errors_surface_as_template_errors() {
        let err = render_plan("{% for %}", &plan(), &Parameters::new()).unwrap_err();
        assert!(matches!(err, PlanError::Template(_)));
    }
}
